//! Sensor sample row models.

use sqlx::FromRow;

use focusdesk_core::error::{CoreError, CoreResult};
use focusdesk_core::samples::{BiometricSample, EnvironmentSample, Posture};
use focusdesk_core::types::{DbId, Timestamp};

/// An environment reading from the `environment_samples` table.
#[derive(Debug, Clone, FromRow)]
pub struct EnvironmentSampleRow {
    pub id: DbId,
    pub device_id: DbId,
    pub session_id: Option<DbId>,
    pub timestamp: Timestamp,
    pub illuminance: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub noise_level: f64,
}

impl EnvironmentSampleRow {
    pub fn into_domain(self) -> EnvironmentSample {
        EnvironmentSample {
            device_id: self.device_id,
            session_id: self.session_id,
            timestamp: self.timestamp,
            illuminance: self.illuminance,
            temperature: self.temperature,
            humidity: self.humidity,
            noise_level: self.noise_level,
        }
    }
}

/// A biometric reading from the `biometric_samples` table.
#[derive(Debug, Clone, FromRow)]
pub struct BiometricSampleRow {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: Option<DbId>,
    pub timestamp: Timestamp,
    pub heart_rate: f64,
    pub hrv: f64,
    pub posture: String,
    pub movement_frequency: f64,
}

impl BiometricSampleRow {
    pub fn into_domain(self) -> CoreResult<BiometricSample> {
        let posture = Posture::parse(&self.posture).ok_or_else(|| {
            CoreError::StoreUnavailable(format!(
                "biometric sample {} has unknown posture '{}'",
                self.id, self.posture
            ))
        })?;
        Ok(BiometricSample {
            user_id: self.user_id,
            session_id: self.session_id,
            timestamp: self.timestamp,
            heart_rate: self.heart_rate,
            hrv: self.hrv,
            posture,
            movement_frequency: self.movement_frequency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    #[test]
    fn biometric_row_decodes_posture() {
        let row = BiometricSampleRow {
            id: 1,
            user_id: 7,
            session_id: Some(99),
            timestamp: Utc::now(),
            heart_rate: 72.0,
            hrv: 55.0,
            posture: "hunched".into(),
            movement_frequency: 2.0,
        };
        let sample = row.into_domain().expect("decodes");
        assert_eq!(sample.posture, Posture::Hunched);
    }

    #[test]
    fn unknown_posture_is_a_store_error() {
        let row = BiometricSampleRow {
            id: 1,
            user_id: 7,
            session_id: None,
            timestamp: Utc::now(),
            heart_rate: 72.0,
            hrv: 55.0,
            posture: "slouched".into(),
            movement_frequency: 2.0,
        };
        assert_matches!(row.into_domain().unwrap_err(), CoreError::StoreUnavailable(_));
    }
}
