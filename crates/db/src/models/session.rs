//! Study session row model.

use sqlx::types::Json;
use sqlx::FromRow;

use focusdesk_core::error::{CoreError, CoreResult};
use focusdesk_core::session::{Interruption, SessionStatus, StudySession};
use focusdesk_core::types::{DbId, Timestamp};

/// A study session row from the `study_sessions` table.
///
/// Interruptions are stored as a JSONB array; `focus_score` as a SMALLINT
/// constrained to `[0, 100]` by the schema.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub status: String,
    pub interruptions: Json<Vec<Interruption>>,
    pub focus_score: Option<i16>,
}

impl SessionRow {
    /// Decode the row into the domain entity.
    pub fn into_domain(self) -> CoreResult<StudySession> {
        let status = SessionStatus::parse(&self.status).ok_or_else(|| {
            CoreError::StoreUnavailable(format!(
                "session {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;
        let focus_score = self
            .focus_score
            .map(|score| {
                u8::try_from(score).map_err(|_| {
                    CoreError::StoreUnavailable(format!(
                        "session {} has out-of-range focus score {score}",
                        self.id
                    ))
                })
            })
            .transpose()?;
        Ok(StudySession {
            id: self.id,
            task_id: self.task_id,
            user_id: self.user_id,
            start_time: self.start_time,
            end_time: self.end_time,
            status,
            interruptions: self.interruptions.0,
            focus_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use focusdesk_core::session::InterruptionKind;

    fn row(status: &str, focus_score: Option<i16>) -> SessionRow {
        let start = Utc::now();
        SessionRow {
            id: 99,
            task_id: 3,
            user_id: 7,
            start_time: start,
            end_time: Some(start + Duration::seconds(600)),
            status: status.into(),
            interruptions: Json(vec![Interruption {
                time: start + Duration::seconds(60),
                kind: InterruptionKind::ManualPause,
                reason: None,
            }]),
            focus_score,
        }
    }

    #[test]
    fn row_decodes_with_interruptions_and_score() {
        let session = row("completed", Some(73)).into_domain().expect("decodes");
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.focus_score, Some(73));
        assert_eq!(session.interruptions.len(), 1);
        assert_eq!(session.duration_secs(), Some(600));
    }

    #[test]
    fn unknown_status_is_a_store_error() {
        let err = row("paused", None).into_domain().unwrap_err();
        assert_matches!(err, CoreError::StoreUnavailable(_));
    }

    #[test]
    fn negative_focus_score_is_a_store_error() {
        let err = row("completed", Some(-1)).into_domain().unwrap_err();
        assert_matches!(err, CoreError::StoreUnavailable(_));
    }
}
