//! Domain events published on session state transitions.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Event type published when a session starts.
pub const SESSION_STARTED: &str = "session.started";
/// Event type published when an interruption is recorded.
pub const SESSION_PAUSED: &str = "session.paused";
/// Event type published when a session completes.
pub const SESSION_COMPLETED: &str = "session.completed";

/// Channel key for a user's realtime push channel.
pub fn user_channel(user_id: DbId) -> String {
    user_id.to_string()
}

/// A session/task state-change event delivered to realtime subscribers.
///
/// Constructed via [`SessionEvent::new`] and enriched with the builder
/// methods. Delivery is best-effort and at-most-once; events are values,
/// not durable log entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Dot-separated event name, e.g. `"session.started"`.
    pub event_type: String,

    pub task_id: Option<DbId>,

    pub session_id: Option<DbId>,

    pub user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: Timestamp,
}

impl SessionEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            event_type: event_type.into(),
            task_id: None,
            session_id: None,
            user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp,
        }
    }

    pub fn with_task(mut self, task_id: DbId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    pub fn with_session(mut self, session_id: DbId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_user(mut self, user_id: DbId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn bare_event_has_empty_optional_fields() {
        let event = SessionEvent::new(SESSION_STARTED, Utc::now());
        assert_eq!(event.event_type, "session.started");
        assert!(event.task_id.is_none());
        assert!(event.session_id.is_none());
        assert!(event.user_id.is_none());
        assert!(event.payload.is_object());
    }

    #[test]
    fn builder_methods_set_fields() {
        let event = SessionEvent::new(SESSION_COMPLETED, Utc::now())
            .with_task(1)
            .with_session(2)
            .with_user(3)
            .with_payload(serde_json::json!({ "focus_score": 85 }));
        assert_eq!(event.task_id, Some(1));
        assert_eq!(event.session_id, Some(2));
        assert_eq!(event.user_id, Some(3));
        assert_eq!(event.payload["focus_score"], 85);
    }
}
