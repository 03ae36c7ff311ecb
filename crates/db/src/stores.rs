//! Adapters from the connection pool to the core store traits.

use async_trait::async_trait;

use focusdesk_core::error::{CoreError, CoreResult};
use focusdesk_core::samples::{BiometricSample, EnvironmentSample};
use focusdesk_core::session::{NewSession, StudySession, Task};
use focusdesk_core::store::{SampleReader, SessionStore, TaskStore, TimeRange};
use focusdesk_core::types::DbId;

use crate::repositories::{SampleRepo, SessionRepo, TaskRepo};
use crate::DbPool;

/// PostgreSQL-backed implementation of the core store traits.
///
/// Cheap to clone; intended to be wrapped in `Arc<dyn …>` once per trait
/// when wiring up the controller.
#[derive(Clone)]
pub struct PgStores {
    pool: DbPool,
}

impl PgStores {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn store_err(err: sqlx::Error) -> CoreError {
    CoreError::StoreUnavailable(err.to_string())
}

#[async_trait]
impl TaskStore for PgStores {
    async fn get(&self, task_id: DbId) -> CoreResult<Task> {
        TaskRepo::find_by_id(&self.pool, task_id)
            .await
            .map_err(store_err)?
            .ok_or(CoreError::NotFound {
                entity: "task",
                id: task_id,
            })?
            .into_domain()
    }

    async fn save(&self, task: &Task) -> CoreResult<()> {
        let updated = TaskRepo::update_state(&self.pool, task)
            .await
            .map_err(store_err)?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "task",
                id: task.id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgStores {
    async fn create(&self, session: &NewSession) -> CoreResult<DbId> {
        let row = SessionRepo::create(&self.pool, session)
            .await
            .map_err(store_err)?;
        Ok(row.id)
    }

    async fn get(&self, session_id: DbId) -> CoreResult<StudySession> {
        SessionRepo::find_by_id(&self.pool, session_id)
            .await
            .map_err(store_err)?
            .ok_or(CoreError::NotFound {
                entity: "session",
                id: session_id,
            })?
            .into_domain()
    }

    async fn save(&self, session: &StudySession) -> CoreResult<()> {
        let updated = SessionRepo::update_state(&self.pool, session)
            .await
            .map_err(store_err)?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "session",
                id: session.id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SampleReader for PgStores {
    async fn environment_window(
        &self,
        session_id: DbId,
        range: &TimeRange,
    ) -> CoreResult<Vec<EnvironmentSample>> {
        let rows = SampleRepo::environment_for_session(&self.pool, session_id, range)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(|row| row.into_domain()).collect())
    }

    async fn biometric_window(
        &self,
        session_id: DbId,
        range: &TimeRange,
    ) -> CoreResult<Vec<BiometricSample>> {
        let rows = SampleRepo::biometric_for_session(&self.pool, session_id, range)
            .await
            .map_err(store_err)?;
        rows.into_iter().map(|row| row.into_domain()).collect()
    }

    async fn latest_biometric(&self, user_id: DbId) -> CoreResult<Option<BiometricSample>> {
        SampleRepo::latest_biometric_for_user(&self.pool, user_id)
            .await
            .map_err(store_err)?
            .map(|row| row.into_domain())
            .transpose()
    }

    async fn latest_environment(&self) -> CoreResult<Option<EnvironmentSample>> {
        let row = SampleRepo::latest_environment(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(row.map(|row| row.into_domain()))
    }
}
