use std::sync::Arc;

use focusdesk_core::controller::SessionController;
use focusdesk_events::Notifier;

use crate::config::ServerConfig;

/// Shared application state available to all axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: focusdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Realtime notifier (WebSocket push).
    pub notifier: Arc<Notifier>,
    /// Task/session command controller.
    pub controller: Arc<SessionController>,
}
