//! Handlers for derived-metrics queries: focus scores, posture and
//! environment analyses, and study reports.
//!
//! These are read paths; they query sample windows directly and feed them
//! through the pure scoring/insight functions in `focusdesk-core`.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use focusdesk_core::error::CoreError;
use focusdesk_core::insights::{self, Insight, StudyReport};
use focusdesk_core::samples::{BiometricSample, EnvironmentSample};
use focusdesk_core::scoring::{self, EnvironmentAnalysis, PostureAnalysis, ScoreResult};
use focusdesk_core::session::StudySession;
use focusdesk_core::store::TimeRange;
use focusdesk_core::types::{DbId, Timestamp};
use focusdesk_db::repositories::{SampleRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// How many recent completed sessions feed the insight generator.
const INSIGHT_SESSION_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request / query parameter types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/v1/analytics/focus-level`.
#[derive(Debug, Deserialize)]
pub struct FocusLevelQuery {
    pub user_id: DbId,
}

/// Request body for `POST /api/v1/analytics/insights/generate`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateReportRequest {
    #[validate(range(min = 1))]
    pub user_id: DbId,
    pub from: Timestamp,
    pub to: Timestamp,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a session or 404.
async fn load_session(state: &AppState, session_id: DbId) -> AppResult<StudySession> {
    let session = SessionRepo::find_by_id(&state.pool, session_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "session",
            id: session_id,
        })?
        .into_domain()?;
    Ok(session)
}

/// The sample window covered by a session: `[start, end]` for completed
/// sessions, `[start, now]` while still active.
fn session_range(session: &StudySession) -> TimeRange {
    TimeRange {
        start: session.start_time,
        end: session.end_time.unwrap_or_else(Utc::now),
    }
}

async fn biometric_window(
    state: &AppState,
    session_id: DbId,
    range: &TimeRange,
) -> AppResult<Vec<BiometricSample>> {
    let samples = SampleRepo::biometric_for_session(&state.pool, session_id, range)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(samples)
}

async fn environment_window(
    state: &AppState,
    session_id: DbId,
    range: &TimeRange,
) -> AppResult<Vec<EnvironmentSample>> {
    let samples = SampleRepo::environment_for_session(&state.pool, session_id, range)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect();
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/analytics/focus-level?user_id=N -- instantaneous focus score
/// from the user's latest biometric sample and the latest environment reading.
pub async fn focus_level(
    State(state): State<AppState>,
    Query(query): Query<FocusLevelQuery>,
) -> AppResult<Json<DataResponse<ScoreResult>>> {
    let biometric = SampleRepo::latest_biometric_for_user(&state.pool, query.user_id)
        .await?
        .map(|row| row.into_domain())
        .transpose()?;
    let environment = SampleRepo::latest_environment(&state.pool)
        .await?
        .map(|row| row.into_domain());

    let result = scoring::compute_focus_score(biometric.as_ref(), environment.as_ref());
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/analytics/focus/{session_id} -- focus score over the
/// session's sample window.
pub async fn session_focus(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ScoreResult>>> {
    let session = load_session(&state, session_id).await?;
    let range = session_range(&session);

    let biometric = biometric_window(&state, session_id, &range).await?;
    let environment = environment_window(&state, session_id, &range).await?;

    let result = scoring::compute_focus_score(biometric.last(), environment.last());
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/analytics/posture/{session_id} -- posture analysis over the
/// session window.
pub async fn session_posture(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostureAnalysis>>> {
    let session = load_session(&state, session_id).await?;
    let range = session_range(&session);

    let biometric = biometric_window(&state, session_id, &range).await?;
    let analysis = scoring::analyze_posture(&biometric);
    Ok(Json(DataResponse { data: analysis }))
}

/// GET /api/v1/analytics/environment/{session_id} -- environment summary
/// over the session window. `data` is null when no samples were recorded.
pub async fn session_environment(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<EnvironmentAnalysis>>>> {
    let session = load_session(&state, session_id).await?;
    let range = session_range(&session);

    let environment = environment_window(&state, session_id, &range).await?;
    let summary = scoring::summarize_environment(&environment);
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/analytics/insights/generate -- study report over a date range.
pub async fn generate_report(
    State(state): State<AppState>,
    Json(payload): Json<GenerateReportRequest>,
) -> AppResult<Json<DataResponse<StudyReport>>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if payload.from > payload.to {
        return Err(AppError::BadRequest(
            "'from' must not be later than 'to'".into(),
        ));
    }
    let range = TimeRange {
        start: payload.from,
        end: payload.to,
    };

    let sessions = SessionRepo::list_by_user_in_range(&state.pool, payload.user_id, &range)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<Result<Vec<_>, _>>()?;
    let biometric = SampleRepo::biometric_for_user_in_range(&state.pool, payload.user_id, &range)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<Result<Vec<_>, _>>()?;
    let environment = SampleRepo::environment_in_range(&state.pool, &range)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<Vec<_>>();

    let report = insights::generate_report(&sessions, &biometric, &environment);
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/analytics/insights/{user_id} -- derived insights over the
/// user's recent completed sessions.
pub async fn user_insights(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Insight>>>> {
    let sessions =
        SessionRepo::list_completed_by_user(&state.pool, user_id, INSIGHT_SESSION_LIMIT)
            .await?
            .into_iter()
            .map(|row| row.into_domain())
            .collect::<Result<Vec<_>, _>>()?;

    let insights = insights::session_insights(&sessions);
    Ok(Json(DataResponse { data: insights }))
}
