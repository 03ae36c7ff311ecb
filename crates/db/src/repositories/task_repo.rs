//! Repository for the `tasks` table.

use sqlx::PgPool;

use focusdesk_core::session::Task;
use focusdesk_core::types::DbId;

use crate::models::task::{CreateTask, TaskRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, subject, priority, status, \
                       current_session_id, created_at, updated_at, completed_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<TaskRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, title, description, subject, priority)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.subject)
            .bind(input.priority.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a task by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TaskRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's tasks, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<TaskRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Persist a task's lifecycle state. Returns `true` if the row was updated.
    pub async fn update_state(pool: &PgPool, task: &Task) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks
             SET status = $2, current_session_id = $3, updated_at = $4, completed_at = $5
             WHERE id = $1",
        )
        .bind(task.id)
        .bind(task.status.as_str())
        .bind(task.current_session_id)
        .bind(task.updated_at)
        .bind(task.completed_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
