//! Handlers for task CRUD and session commands.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use focusdesk_core::controller::SessionStats;
use focusdesk_core::session::{Task, TaskPriority};
use focusdesk_core::types::DbId;
use focusdesk_db::models::task::CreateTask;
use focusdesk_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/tasks`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Already-authenticated owner of the task.
    #[validate(range(min = 1))]
    pub user_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub subject: Option<String>,
    /// Defaults to `medium` when omitted.
    pub priority: Option<TaskPriority>,
}

/// Response body for a session command against a task.
#[derive(Debug, Serialize)]
pub struct SessionCommandResponse {
    pub task_id: DbId,
    /// Set for `start`; the other commands act on the task's current session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<DbId>,
    pub state: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks -- create a task.
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let input = CreateTask {
        user_id: payload.user_id,
        title: payload.title,
        description: payload.description,
        subject: payload.subject,
        priority: payload.priority.unwrap_or_default(),
    };
    let task = TaskRepo::create(&state.pool, &input).await?.into_domain()?;

    tracing::info!(task_id = task.id, user_id = task.user_id, "Task created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/user/{user_id} -- a user's tasks, newest first.
pub async fn list_user_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let tasks = TaskRepo::list_by_user(&state.pool, user_id)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks/{id}/start -- begin a study session.
pub async fn start_task(
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionCommandResponse>>> {
    let session_id = state.controller.start_session(task_id).await?;
    Ok(Json(DataResponse {
        data: SessionCommandResponse {
            task_id,
            session_id: Some(session_id),
            state: "in_progress",
        },
    }))
}

/// POST /api/v1/tasks/{id}/pause -- record a pause on the active session.
pub async fn pause_task(
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionCommandResponse>>> {
    state.controller.pause_session(task_id).await?;
    Ok(Json(DataResponse {
        data: SessionCommandResponse {
            task_id,
            session_id: None,
            state: "paused",
        },
    }))
}

/// POST /api/v1/tasks/{id}/complete -- finish the active session.
pub async fn complete_task(
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionCommandResponse>>> {
    state.controller.complete_session(task_id).await?;
    Ok(Json(DataResponse {
        data: SessionCommandResponse {
            task_id,
            session_id: None,
            state: "completed",
        },
    }))
}

/// GET /api/v1/tasks/session/{id}/stats -- aggregate session snapshot.
pub async fn session_stats(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionStats>>> {
    let stats = state.controller.session_stats(session_id).await?;
    Ok(Json(DataResponse { data: stats }))
}
