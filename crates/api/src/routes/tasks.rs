//! Route definitions for tasks and session commands, mounted at `/tasks`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// ```text
/// POST /                        -> create_task
/// GET  /user/{user_id}          -> list_user_tasks
/// POST /{id}/start              -> start_task
/// POST /{id}/pause              -> pause_task
/// POST /{id}/complete           -> complete_task
/// GET  /session/{id}/stats      -> session_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tasks::create_task))
        .route("/user/{user_id}", get(tasks::list_user_tasks))
        .route("/{id}/start", post(tasks::start_task))
        .route("/{id}/pause", post(tasks::pause_task))
        .route("/{id}/complete", post(tasks::complete_task))
        .route("/session/{id}/stats", get(tasks::session_stats))
}
