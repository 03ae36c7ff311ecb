//! Task and study-session entities and their state machine.
//!
//! A session has two persisted states, `Active` and `Completed`. "Paused"
//! is not a state: a pause is an [`Interruption`] appended to an active
//! session, and a session counts as paused only in the UI sense that its
//! most recent interruption has no matching resume. `Completed` is
//! terminal; completed sessions are immutable history.
//!
//! Every transition takes `now` as a parameter so the machine stays pure
//! and deterministic under test.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// User-assigned task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Lifecycle status of a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// What interrupted a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionKind {
    ManualPause,
    Distraction,
    DeviceOffline,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// One timestamped interruption recorded against an active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interruption {
    pub time: Timestamp,
    pub kind: InterruptionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A unit of study work owned by one user.
///
/// Invariant: `current_session_id` is `Some` if and only if `status` is
/// [`TaskStatus::InProgress`] — a task has at most one active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub current_session_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// A not-yet-persisted session produced by [`Task::begin_session`].
///
/// The store assigns the id on insert; the caller then attaches it to the
/// task via [`Task::attach_session`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub task_id: DbId,
    pub user_id: DbId,
    pub start_time: Timestamp,
}

/// One continuous (possibly interrupted) study attempt tied to one task.
///
/// Invariants: `end_time` is `None` while the session is active and is
/// `>= start_time` once set; interruption times are monotonically
/// non-decreasing. Sessions are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub status: SessionStatus,
    pub interruptions: Vec<Interruption>,
    /// Derived focus score, set at completion. May be recomputed.
    pub focus_score: Option<u8>,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

impl Task {
    /// Begin a new session for this task.
    ///
    /// Fails with [`CoreError::Conflict`] when the task already has one in
    /// flight. Does not mutate the task — the caller persists the session
    /// first, then calls [`Task::attach_session`] with the assigned id.
    pub fn begin_session(&self, now: Timestamp) -> CoreResult<NewSession> {
        if self.status == TaskStatus::InProgress {
            return Err(CoreError::Conflict("Task is already in progress".into()));
        }
        Ok(NewSession {
            task_id: self.id,
            user_id: self.user_id,
            start_time: now,
        })
    }

    /// Mark the task in progress with the given session attached.
    pub fn attach_session(&mut self, session_id: DbId, now: Timestamp) {
        self.status = TaskStatus::InProgress;
        self.current_session_id = Some(session_id);
        self.updated_at = now;
    }

    /// Mark the task completed and detach its session.
    pub fn finish(&mut self, now: Timestamp) {
        self.status = TaskStatus::Completed;
        self.current_session_id = None;
        self.completed_at = Some(now);
        self.updated_at = now;
    }
}

impl StudySession {
    /// Append an interruption to an active session.
    ///
    /// Fails with [`CoreError::InvalidState`] on a completed session and
    /// with [`CoreError::Validation`] if `now` precedes the previous
    /// interruption (the log must stay monotonically non-decreasing).
    pub fn record_interruption(
        &mut self,
        kind: InterruptionKind,
        reason: Option<String>,
        now: Timestamp,
    ) -> CoreResult<()> {
        if self.status != SessionStatus::Active {
            return Err(CoreError::InvalidState("Session is not active".into()));
        }
        if let Some(last) = self.interruptions.last() {
            if now < last.time {
                return Err(CoreError::Validation(
                    "Interruption time precedes the previous entry".into(),
                ));
            }
        }
        self.interruptions.push(Interruption { time: now, kind, reason });
        Ok(())
    }

    /// Complete an active session with its final focus score.
    ///
    /// Sets `end_time` and moves to the terminal [`SessionStatus::Completed`]
    /// state. No transition leaves `Completed`.
    pub fn complete(&mut self, focus_score: u8, now: Timestamp) -> CoreResult<()> {
        if self.status != SessionStatus::Active {
            return Err(CoreError::InvalidState("Session is not active".into()));
        }
        if now < self.start_time {
            return Err(CoreError::Validation(
                "Session end time precedes its start".into(),
            ));
        }
        self.end_time = Some(now);
        self.status = SessionStatus::Completed;
        self.focus_score = Some(focus_score);
        Ok(())
    }

    /// Session duration in whole seconds.
    ///
    /// `None` while the session is still active — callers must treat the
    /// absence as "undefined", never as zero.
    pub fn duration_secs(&self) -> Option<i64> {
        self.end_time
            .map(|end| end.signed_duration_since(self.start_time).num_seconds())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    fn task(status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: 1,
            user_id: 7,
            title: "Read chapter 4".into(),
            description: None,
            subject: Some("math".into()),
            priority: TaskPriority::default(),
            status,
            current_session_id: if status == TaskStatus::InProgress {
                Some(99)
            } else {
                None
            },
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    fn active_session(start: Timestamp) -> StudySession {
        StudySession {
            id: 99,
            task_id: 1,
            user_id: 7,
            start_time: start,
            end_time: None,
            status: SessionStatus::Active,
            interruptions: Vec::new(),
            focus_score: None,
        }
    }

    #[test]
    fn begin_session_on_pending_task() {
        let t = task(TaskStatus::Pending);
        let now = Utc::now();
        let new = t.begin_session(now).expect("should start");
        assert_eq!(new.task_id, t.id);
        assert_eq!(new.user_id, t.user_id);
        assert_eq!(new.start_time, now);
    }

    #[test]
    fn begin_session_on_in_progress_task_conflicts() {
        let t = task(TaskStatus::InProgress);
        let err = t.begin_session(Utc::now()).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
        // The task itself is untouched.
        assert_eq!(t.status, TaskStatus::InProgress);
        assert_eq!(t.current_session_id, Some(99));
    }

    #[test]
    fn completed_task_can_be_restarted() {
        // Only in_progress blocks a new session.
        let t = task(TaskStatus::Completed);
        assert!(t.begin_session(Utc::now()).is_ok());
    }

    #[test]
    fn attach_and_finish_maintain_session_invariant() {
        let mut t = task(TaskStatus::Pending);
        let now = Utc::now();

        t.attach_session(42, now);
        assert_eq!(t.status, TaskStatus::InProgress);
        assert_eq!(t.current_session_id, Some(42));

        let later = now + Duration::seconds(600);
        t.finish(later);
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.current_session_id, None);
        assert_eq!(t.completed_at, Some(later));
    }

    #[test]
    fn record_interruption_appends_in_order() {
        let start = Utc::now();
        let mut s = active_session(start);

        s.record_interruption(InterruptionKind::ManualPause, None, start + Duration::seconds(60))
            .expect("first pause");
        s.record_interruption(
            InterruptionKind::ManualPause,
            Some("phone call".into()),
            start + Duration::seconds(120),
        )
        .expect("second pause");

        assert_eq!(s.interruptions.len(), 2);
        assert!(s.interruptions[0].time <= s.interruptions[1].time);
        assert_eq!(s.interruptions[1].reason.as_deref(), Some("phone call"));
    }

    #[test]
    fn interruption_rejects_non_monotonic_time() {
        let start = Utc::now();
        let mut s = active_session(start);
        s.record_interruption(InterruptionKind::ManualPause, None, start + Duration::seconds(120))
            .expect("first pause");

        let err = s
            .record_interruption(InterruptionKind::Distraction, None, start + Duration::seconds(60))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(s.interruptions.len(), 1);
    }

    #[test]
    fn interruption_on_completed_session_is_invalid() {
        let start = Utc::now();
        let mut s = active_session(start);
        s.complete(80, start + Duration::seconds(60)).expect("complete");

        let err = s
            .record_interruption(InterruptionKind::ManualPause, None, start + Duration::seconds(120))
            .unwrap_err();
        assert_matches!(err, CoreError::InvalidState(_));
    }

    #[test]
    fn complete_sets_end_time_and_score() {
        let start = Utc::now();
        let mut s = active_session(start);
        let end = start + Duration::seconds(600);

        s.complete(73, end).expect("complete");
        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.end_time, Some(end));
        assert_eq!(s.focus_score, Some(73));
        assert!(s.end_time.expect("end") >= s.start_time);
    }

    #[test]
    fn complete_is_terminal() {
        let start = Utc::now();
        let mut s = active_session(start);
        s.complete(73, start + Duration::seconds(600)).expect("complete");

        let err = s.complete(90, start + Duration::seconds(700)).unwrap_err();
        assert_matches!(err, CoreError::InvalidState(_));
        // First completion stands.
        assert_eq!(s.focus_score, Some(73));
    }

    #[test]
    fn complete_rejects_end_before_start() {
        let start = Utc::now();
        let mut s = active_session(start);
        let err = s.complete(50, start - Duration::seconds(1)).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(s.status, SessionStatus::Active);
    }

    #[test]
    fn duration_is_none_while_active() {
        let s = active_session(Utc::now());
        assert_eq!(s.duration_secs(), None);
    }

    #[test]
    fn duration_in_seconds_once_completed() {
        let start = Utc::now();
        let mut s = active_session(start);
        s.complete(60, start + Duration::seconds(600)).expect("complete");
        assert_eq!(s.duration_secs(), Some(600));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        for status in [SessionStatus::Active, SessionStatus::Completed] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("archived"), None);
    }
}
