//! Repository for the `study_sessions` table.

use sqlx::types::Json;
use sqlx::PgPool;

use focusdesk_core::session::{NewSession, StudySession};
use focusdesk_core::store::TimeRange;
use focusdesk_core::types::DbId;

use crate::models::session::SessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task_id, user_id, start_time, end_time, status, \
                       interruptions, focus_score";

/// Provides CRUD operations for study sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new active session, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewSession) -> Result<SessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO study_sessions (task_id, user_id, start_time)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(input.task_id)
            .bind(input.user_id)
            .bind(input.start_time)
            .fetch_one(pool)
            .await
    }

    /// Find a session by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM study_sessions WHERE id = $1");
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist a session's state (interruptions, completion). Returns `true`
    /// if the row was updated.
    pub async fn update_state(pool: &PgPool, session: &StudySession) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE study_sessions
             SET end_time = $2, status = $3, interruptions = $4, focus_score = $5
             WHERE id = $1",
        )
        .bind(session.id)
        .bind(session.end_time)
        .bind(session.status.as_str())
        .bind(Json(&session.interruptions))
        .bind(session.focus_score.map(i16::from))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// A user's most recent completed sessions, newest first.
    pub async fn list_completed_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<SessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM study_sessions
             WHERE user_id = $1 AND status = 'completed'
             ORDER BY start_time DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// A user's sessions whose start falls inside the range, oldest first.
    pub async fn list_by_user_in_range(
        pool: &PgPool,
        user_id: DbId,
        range: &TimeRange,
    ) -> Result<Vec<SessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM study_sessions
             WHERE user_id = $1 AND start_time >= $2 AND start_time <= $3
             ORDER BY start_time ASC"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(user_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await
    }
}
