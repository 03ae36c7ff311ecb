//! Read-only sensor sample types.
//!
//! Samples are produced by the ingestion layer and only ever *read* by the
//! core, through [`crate::store::SampleReader`]. The core never mutates them.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Sitting posture reported by the smartwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    Good,
    Hunched,
}

impl Posture {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Hunched => "hunched",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "good" => Some(Self::Good),
            "hunched" => Some(Self::Hunched),
            _ => None,
        }
    }
}

/// One environment reading from a sensing device (e.g. the desk lamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSample {
    pub device_id: DbId,
    /// Set when the reading was taken during a study session.
    pub session_id: Option<DbId>,
    pub timestamp: Timestamp,
    /// Illuminance in lux.
    pub illuminance: f64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Noise level in dB.
    pub noise_level: f64,
}

/// One biometric reading from a wearable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricSample {
    pub user_id: DbId,
    pub session_id: Option<DbId>,
    pub timestamp: Timestamp,
    /// Heart rate in beats per minute.
    pub heart_rate: f64,
    /// Heart-rate variability in milliseconds.
    pub hrv: f64,
    pub posture: Posture,
    /// Movements per minute.
    pub movement_frequency: f64,
}
