//! Task controller: session commands with per-task serialization.
//!
//! Wraps the session state machine with persistence and event publication.
//! The single-active-session-per-task invariant is a check-then-act
//! sequence across two persisted entities, so every command for a task id
//! runs under that task's lock; no ordering guarantee exists across tasks.
//! Preconditions are re-validated on every call, which makes retrying a
//! command after an unacknowledged store write safe.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{CoreError, CoreResult};
use crate::event::{self, SessionEvent};
use crate::scoring;
use crate::session::{InterruptionKind, SessionStatus, StudySession, Task};
use crate::store::{EventSink, SampleReader, SessionStore, TaskStore, TimeRange};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Per-task locks
// ---------------------------------------------------------------------------

/// Hands out one lock per task id.
///
/// Locks are created on first use and kept for the lifetime of the
/// controller; the registry itself is guarded by a short-lived mutex that
/// is never held across an await on the task lock.
#[derive(Default)]
struct TaskLocks {
    inner: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl TaskLocks {
    async fn acquire(&self, task_id: DbId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(task_id).or_default())
        };
        lock.lock_owned().await
    }
}

// ---------------------------------------------------------------------------
// Session stats
// ---------------------------------------------------------------------------

/// Read-only snapshot of a session's aggregate state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    /// `None` while the session is still active.
    pub duration_secs: Option<i64>,
    pub interruption_count: usize,
    pub focus_score: Option<u8>,
    pub status: SessionStatus,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Orchestrates tasks and their sessions against injected stores.
pub struct SessionController {
    tasks: Arc<dyn TaskStore>,
    sessions: Arc<dyn SessionStore>,
    samples: Arc<dyn SampleReader>,
    events: Arc<dyn EventSink>,
    locks: TaskLocks,
}

impl SessionController {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        sessions: Arc<dyn SessionStore>,
        samples: Arc<dyn SampleReader>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            tasks,
            sessions,
            samples,
            events,
            locks: TaskLocks::default(),
        }
    }

    /// Start a new session for a task, returning the session id.
    ///
    /// Fails with `Conflict` when the task already has an active session.
    /// If the task write fails after the session insert, the session row
    /// is left behind unattached; no task references it, so it is
    /// unreachable from every command path and a retry starts fresh.
    pub async fn start_session(&self, task_id: DbId) -> CoreResult<DbId> {
        let _guard = self.locks.acquire(task_id).await;

        let mut task = self.tasks.get(task_id).await?;
        let now = Utc::now();
        let new_session = task.begin_session(now)?;

        let session_id = self.sessions.create(&new_session).await?;
        task.attach_session(session_id, now);
        self.tasks.save(&task).await?;

        self.events
            .publish(
                &event::user_channel(task.user_id),
                SessionEvent::new(event::SESSION_STARTED, now)
                    .with_task(task_id)
                    .with_session(session_id)
                    .with_user(task.user_id),
            )
            .await;

        Ok(session_id)
    }

    /// Record a manual pause against the task's active session.
    pub async fn pause_session(&self, task_id: DbId) -> CoreResult<()> {
        let _guard = self.locks.acquire(task_id).await;

        let task = self.tasks.get(task_id).await?;
        let session_id = active_session_id(&task)?;
        let mut session = self.sessions.get(session_id).await?;

        let now = Utc::now();
        session.record_interruption(InterruptionKind::ManualPause, None, now)?;
        self.sessions.save(&session).await?;

        self.events
            .publish(
                &event::user_channel(task.user_id),
                SessionEvent::new(event::SESSION_PAUSED, now)
                    .with_task(task_id)
                    .with_session(session_id)
                    .with_user(task.user_id)
                    .with_payload(serde_json::json!({
                        "interruptions": session.interruptions.len(),
                    })),
            )
            .await;

        Ok(())
    }

    /// Complete the task's active session.
    ///
    /// The final focus score is derived from the latest biometric and
    /// environment readings in the session's `[start, now]` window.
    pub async fn complete_session(&self, task_id: DbId) -> CoreResult<()> {
        let _guard = self.locks.acquire(task_id).await;

        let mut task = self.tasks.get(task_id).await?;
        let session_id = active_session_id(&task)?;
        let mut session = self.sessions.get(session_id).await?;

        let now = Utc::now();
        let range = TimeRange {
            start: session.start_time,
            end: now,
        };
        let biometric = self.samples.biometric_window(session_id, &range).await?;
        let environment = self.samples.environment_window(session_id, &range).await?;
        let score = scoring::compute_focus_score(biometric.last(), environment.last());

        session.complete(score.score, now)?;
        self.sessions.save(&session).await?;

        task.finish(now);
        self.tasks.save(&task).await?;

        self.events
            .publish(
                &event::user_channel(task.user_id),
                SessionEvent::new(event::SESSION_COMPLETED, now)
                    .with_task(task_id)
                    .with_session(session_id)
                    .with_user(task.user_id)
                    .with_payload(serde_json::json!({
                        "focus_score": score.score,
                        "duration_secs": session.duration_secs(),
                    })),
            )
            .await;

        Ok(())
    }

    /// Read-only aggregate stats for a session. Takes no task lock.
    pub async fn session_stats(&self, session_id: DbId) -> CoreResult<SessionStats> {
        let session = self.sessions.get(session_id).await?;
        Ok(stats_of(&session))
    }
}

/// The task's active session id, or `InvalidState` when none is attached.
fn active_session_id(task: &Task) -> CoreResult<DbId> {
    task.current_session_id
        .ok_or_else(|| CoreError::InvalidState("No active session found".into()))
}

fn stats_of(session: &StudySession) -> SessionStats {
    SessionStats {
        duration_secs: session.duration_secs(),
        interruption_count: session.interruptions.len(),
        focus_score: session.focus_score,
        status: session.status,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
