//! Collaborator traits at the persistence and event-delivery seams.
//!
//! The core owns the contracts; `focusdesk-db` and `focusdesk-events`
//! provide the PostgreSQL and in-process implementations. The core never
//! caches store state across calls — every operation re-reads current data.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::event::SessionEvent;
use crate::samples::{BiometricSample, EnvironmentSample};
use crate::session::{NewSession, StudySession, Task};
use crate::types::{DbId, Timestamp};

/// Closed time range `[start, end]` for sample window queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Persistence for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch a task, or `NotFound`.
    async fn get(&self, task_id: DbId) -> CoreResult<Task>;

    /// Persist the task's current lifecycle state.
    async fn save(&self, task: &Task) -> CoreResult<()>;
}

/// Persistence for study sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new active session, returning its assigned id.
    async fn create(&self, session: &NewSession) -> CoreResult<DbId>;

    /// Fetch a session, or `NotFound`.
    async fn get(&self, session_id: DbId) -> CoreResult<StudySession>;

    /// Persist the session's current state (interruptions, completion).
    async fn save(&self, session: &StudySession) -> CoreResult<()>;
}

/// Read-only, time-ranged access to sensor samples.
///
/// Window queries return samples in ascending timestamp order and are
/// restartable: re-issuing the same query yields the same samples, or a
/// superset if new data arrived in the meantime.
#[async_trait]
pub trait SampleReader: Send + Sync {
    async fn environment_window(
        &self,
        session_id: DbId,
        range: &TimeRange,
    ) -> CoreResult<Vec<EnvironmentSample>>;

    async fn biometric_window(
        &self,
        session_id: DbId,
        range: &TimeRange,
    ) -> CoreResult<Vec<BiometricSample>>;

    /// Most recent biometric reading for a user, across all sessions.
    async fn latest_biometric(&self, user_id: DbId) -> CoreResult<Option<BiometricSample>>;

    /// Most recent environment reading from any sensing device.
    async fn latest_environment(&self) -> CoreResult<Option<EnvironmentSample>>;
}

/// Fire-and-forget event publication.
///
/// At-most-once, best-effort: when nothing is subscribed to `channel` the
/// event is silently dropped. Must never fail the calling operation.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, channel: &str, event: SessionEvent);
}
