//! Route definitions for analytics queries, mounted at `/analytics`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// ```text
/// GET  /focus-level                -> focus_level
/// GET  /focus/{session_id}         -> session_focus
/// GET  /posture/{session_id}       -> session_posture
/// GET  /environment/{session_id}   -> session_environment
/// POST /insights/generate          -> generate_report
/// GET  /insights/{user_id}         -> user_insights
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/focus-level", get(analytics::focus_level))
        .route("/focus/{session_id}", get(analytics::session_focus))
        .route("/posture/{session_id}", get(analytics::session_posture))
        .route(
            "/environment/{session_id}",
            get(analytics::session_environment),
        )
        .route("/insights/generate", post(analytics::generate_report))
        .route("/insights/{user_id}", get(analytics::user_insights))
}
