//! Read-only repository over the sensor sample tables.
//!
//! Window queries return rows in ascending timestamp order; re-issuing a
//! query yields the same rows or a superset if new data arrived.

use sqlx::PgPool;

use focusdesk_core::store::TimeRange;
use focusdesk_core::types::DbId;

use crate::models::sample::{BiometricSampleRow, EnvironmentSampleRow};

const ENV_COLUMNS: &str =
    "id, device_id, session_id, timestamp, illuminance, temperature, humidity, noise_level";

const BIO_COLUMNS: &str =
    "id, user_id, session_id, timestamp, heart_rate, hrv, posture, movement_frequency";

/// Time-ranged reads over environment and biometric samples.
pub struct SampleRepo;

impl SampleRepo {
    /// Environment samples tagged to a session, inside the range.
    pub async fn environment_for_session(
        pool: &PgPool,
        session_id: DbId,
        range: &TimeRange,
    ) -> Result<Vec<EnvironmentSampleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ENV_COLUMNS} FROM environment_samples
             WHERE session_id = $1 AND timestamp >= $2 AND timestamp <= $3
             ORDER BY timestamp ASC"
        );
        sqlx::query_as::<_, EnvironmentSampleRow>(&query)
            .bind(session_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await
    }

    /// Biometric samples tagged to a session, inside the range.
    pub async fn biometric_for_session(
        pool: &PgPool,
        session_id: DbId,
        range: &TimeRange,
    ) -> Result<Vec<BiometricSampleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {BIO_COLUMNS} FROM biometric_samples
             WHERE session_id = $1 AND timestamp >= $2 AND timestamp <= $3
             ORDER BY timestamp ASC"
        );
        sqlx::query_as::<_, BiometricSampleRow>(&query)
            .bind(session_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await
    }

    /// A user's biometric samples inside the range, across all sessions.
    pub async fn biometric_for_user_in_range(
        pool: &PgPool,
        user_id: DbId,
        range: &TimeRange,
    ) -> Result<Vec<BiometricSampleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {BIO_COLUMNS} FROM biometric_samples
             WHERE user_id = $1 AND timestamp >= $2 AND timestamp <= $3
             ORDER BY timestamp ASC"
        );
        sqlx::query_as::<_, BiometricSampleRow>(&query)
            .bind(user_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await
    }

    /// Environment samples inside the range, regardless of session.
    pub async fn environment_in_range(
        pool: &PgPool,
        range: &TimeRange,
    ) -> Result<Vec<EnvironmentSampleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ENV_COLUMNS} FROM environment_samples
             WHERE timestamp >= $1 AND timestamp <= $2
             ORDER BY timestamp ASC"
        );
        sqlx::query_as::<_, EnvironmentSampleRow>(&query)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await
    }

    /// A user's single most recent biometric sample.
    pub async fn latest_biometric_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<BiometricSampleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {BIO_COLUMNS} FROM biometric_samples
             WHERE user_id = $1
             ORDER BY timestamp DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, BiometricSampleRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The single most recent environment reading from any device.
    pub async fn latest_environment(
        pool: &PgPool,
    ) -> Result<Option<EnvironmentSampleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ENV_COLUMNS} FROM environment_samples
             ORDER BY timestamp DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, EnvironmentSampleRow>(&query)
            .fetch_optional(pool)
            .await
    }
}
