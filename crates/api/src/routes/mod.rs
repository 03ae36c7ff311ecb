//! Route definitions.

pub mod analytics;
pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /tasks                                   create (POST)
/// /tasks/user/{user_id}                    list a user's tasks (GET)
/// /tasks/{id}/start                        begin session (POST)
/// /tasks/{id}/pause                        pause session (POST)
/// /tasks/{id}/complete                     complete session (POST)
/// /tasks/session/{id}/stats                session stats (GET)
///
/// /analytics/focus-level                   instantaneous focus score (GET)
/// /analytics/focus/{session_id}            session focus score (GET)
/// /analytics/posture/{session_id}          posture analysis (GET)
/// /analytics/environment/{session_id}      environment summary (GET)
/// /analytics/insights/generate             study report (POST)
/// /analytics/insights/{user_id}            derived insights (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tasks", tasks::router())
        .nest("/analytics", analytics::router())
}
