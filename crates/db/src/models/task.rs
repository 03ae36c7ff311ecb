//! Task row model and DTOs.

use sqlx::FromRow;

use focusdesk_core::error::{CoreError, CoreResult};
use focusdesk_core::session::{Task, TaskPriority, TaskStatus};
use focusdesk_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub priority: String,
    pub status: String,
    pub current_session_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl TaskRow {
    /// Decode the row into the domain entity.
    pub fn into_domain(self) -> CoreResult<Task> {
        let status = TaskStatus::parse(&self.status).ok_or_else(|| {
            CoreError::StoreUnavailable(format!(
                "task {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;
        let priority = TaskPriority::parse(&self.priority).ok_or_else(|| {
            CoreError::StoreUnavailable(format!(
                "task {} has unknown priority '{}'",
                self.id, self.priority
            ))
        })?;
        Ok(Task {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            subject: self.subject,
            priority,
            status,
            current_session_id: self.current_session_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        })
    }
}

/// DTO for inserting a new task.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub priority: TaskPriority,
}
