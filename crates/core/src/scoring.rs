//! Focus scoring and environment classification.
//!
//! Pure functions from sensor samples to a bounded 0-100 focus score and
//! per-axis environment quality bands. The rule set is intentionally simple
//! and lives entirely in this module so it can be replaced without touching
//! session-state logic.

use serde::Serialize;

use crate::samples::{BiometricSample, EnvironmentSample, Posture};

// ---------------------------------------------------------------------------
// Score thresholds and penalties
// ---------------------------------------------------------------------------

/// HRV above this value indicates elevated stress.
pub const HRV_STRESS_THRESHOLD: f64 = 100.0;
/// Noise above this level (dB) is considered distracting.
pub const NOISE_DISTRACTION_THRESHOLD: f64 = 70.0;
/// Illuminance below this value (lux) is too dim for focused work.
pub const DIM_LIGHT_THRESHOLD: f64 = 200.0;

const HRV_PENALTY: i32 = 20;
const POSTURE_PENALTY: i32 = 15;
const NOISE_PENALTY: i32 = 10;
const LIGHT_PENALTY: i32 = 10;

// ---------------------------------------------------------------------------
// Focus score
// ---------------------------------------------------------------------------

/// A penalty applied while deriving a focus score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusFactor {
    ElevatedHrv,
    HunchedPosture,
    ExcessNoise,
    DimLighting,
}

/// Result of a focus score derivation. Ephemeral, never persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Bounded focus score in `[0, 100]`.
    pub score: u8,
    /// Every penalty that was applied, in evaluation order.
    pub contributing_factors: Vec<FocusFactor>,
}

/// Derive a focus score from the latest biometric and environment readings.
///
/// Starts at 100 and subtracts a fixed penalty per violated threshold,
/// clamped to `[0, 100]`. If either input is absent the score is 0:
/// undefined data means zero confidence, not an error.
pub fn compute_focus_score(
    biometric: Option<&BiometricSample>,
    environment: Option<&EnvironmentSample>,
) -> ScoreResult {
    let (Some(bio), Some(env)) = (biometric, environment) else {
        return ScoreResult {
            score: 0,
            contributing_factors: Vec::new(),
        };
    };

    let mut score: i32 = 100;
    let mut factors = Vec::new();

    if bio.hrv > HRV_STRESS_THRESHOLD {
        score -= HRV_PENALTY;
        factors.push(FocusFactor::ElevatedHrv);
    }
    if bio.posture == Posture::Hunched {
        score -= POSTURE_PENALTY;
        factors.push(FocusFactor::HunchedPosture);
    }
    if env.noise_level > NOISE_DISTRACTION_THRESHOLD {
        score -= NOISE_PENALTY;
        factors.push(FocusFactor::ExcessNoise);
    }
    if env.illuminance < DIM_LIGHT_THRESHOLD {
        score -= LIGHT_PENALTY;
        factors.push(FocusFactor::DimLighting);
    }

    ScoreResult {
        score: score.clamp(0, 100) as u8,
        contributing_factors: factors,
    }
}

// ---------------------------------------------------------------------------
// Environment quality bands
// ---------------------------------------------------------------------------

/// Light quality band derived from illuminance (lux).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightQuality {
    TooDark,
    Optimal,
    TooBright,
}

impl LightQuality {
    pub fn classify(illuminance: f64) -> Self {
        if illuminance < 300.0 {
            Self::TooDark
        } else if illuminance > 1000.0 {
            Self::TooBright
        } else {
            Self::Optimal
        }
    }

    /// Advisory for a non-optimal band.
    pub fn advisory(self) -> Option<&'static str> {
        match self {
            Self::TooDark => Some("Lighting is dim; turn on the desk lamp or add ambient light"),
            Self::TooBright => Some("Lighting is harsh; dim the lamp or draw the curtains"),
            Self::Optimal => None,
        }
    }
}

/// Noise quality band derived from the noise level (dB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseQuality {
    Quiet,
    Moderate,
    Noisy,
}

impl NoiseQuality {
    pub fn classify(noise_level: f64) -> Self {
        if noise_level < 35.0 {
            Self::Quiet
        } else if noise_level > 65.0 {
            Self::Noisy
        } else {
            Self::Moderate
        }
    }

    pub fn advisory(self) -> Option<&'static str> {
        match self {
            Self::Noisy => {
                Some("The room is noisy; use noise-cancelling headphones or find a quieter spot")
            }
            Self::Quiet | Self::Moderate => None,
        }
    }
}

/// Temperature band derived from degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureQuality {
    Cold,
    Comfortable,
    Hot,
}

impl TemperatureQuality {
    pub fn classify(temperature: f64) -> Self {
        if temperature < 20.0 {
            Self::Cold
        } else if temperature > 26.0 {
            Self::Hot
        } else {
            Self::Comfortable
        }
    }

    pub fn advisory(self) -> Option<&'static str> {
        match self {
            Self::Cold => Some("Room temperature is low; raise the thermostat or add a layer"),
            Self::Hot => Some("Room temperature is high; lower the thermostat or turn on a fan"),
            Self::Comfortable => None,
        }
    }
}

/// Humidity band derived from relative humidity (%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityQuality {
    Dry,
    Comfortable,
    Humid,
}

impl HumidityQuality {
    pub fn classify(humidity: f64) -> Self {
        if humidity < 30.0 {
            Self::Dry
        } else if humidity > 60.0 {
            Self::Humid
        } else {
            Self::Comfortable
        }
    }

    pub fn advisory(self) -> Option<&'static str> {
        match self {
            Self::Dry => Some("The air is dry; a humidifier would help"),
            Self::Humid => Some("Humidity is high; dehumidify or ventilate"),
            Self::Comfortable => None,
        }
    }
}

/// Catch-all advisory appended to every environment assessment.
pub const VENTILATION_ADVISORY: &str =
    "Open a window for 5-10 minutes every hour to air out the room";

// ---------------------------------------------------------------------------
// Environment assessment
// ---------------------------------------------------------------------------

/// The four numeric axes a single assessment is derived from.
///
/// Decoupled from [`EnvironmentSample`] so window *averages* can be
/// classified through the same path as single readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentReading {
    pub illuminance: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub noise_level: f64,
}

impl From<&EnvironmentSample> for EnvironmentReading {
    fn from(sample: &EnvironmentSample) -> Self {
        Self {
            illuminance: sample.illuminance,
            temperature: sample.temperature,
            humidity: sample.humidity,
            noise_level: sample.noise_level,
        }
    }
}

/// Per-axis classification plus advisories. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentAssessment {
    pub light: LightQuality,
    pub noise: NoiseQuality,
    pub temperature: TemperatureQuality,
    pub humidity: HumidityQuality,
    pub recommendations: Vec<String>,
}

/// Classify a reading into quality bands and derive advisories.
///
/// Total over the numeric domain; out-of-range or NaN inputs are rejected
/// at the API boundary, not here. The ventilation advisory is always
/// appended last.
pub fn classify_environment(reading: &EnvironmentReading) -> EnvironmentAssessment {
    let light = LightQuality::classify(reading.illuminance);
    let noise = NoiseQuality::classify(reading.noise_level);
    let temperature = TemperatureQuality::classify(reading.temperature);
    let humidity = HumidityQuality::classify(reading.humidity);

    let mut recommendations: Vec<String> = [
        light.advisory(),
        noise.advisory(),
        temperature.advisory(),
        humidity.advisory(),
    ]
    .into_iter()
    .flatten()
    .map(String::from)
    .collect();
    recommendations.push(VENTILATION_ADVISORY.to_string());

    EnvironmentAssessment {
        light,
        noise,
        temperature,
        humidity,
        recommendations,
    }
}

// ---------------------------------------------------------------------------
// Window analyses
// ---------------------------------------------------------------------------

/// Share of good-posture samples below which posture needs improvement.
pub const GOOD_POSTURE_PERCENT_THRESHOLD: f64 = 60.0;
/// Hunched-sample count above which posture needs improvement.
pub const BAD_POSTURE_COUNT_THRESHOLD: usize = 5;

/// Posture analysis over a window of biometric samples.
///
/// Computed from the actual samples: the good-posture percentage is the
/// share of samples with [`Posture::Good`], and the bad posture count is
/// the number of hunched samples. An empty window counts as fully good.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostureAnalysis {
    pub good_posture_percentage: f64,
    pub bad_posture_count: usize,
    pub needs_improvement: bool,
    pub recommendations: Vec<String>,
}

/// Analyze posture over a sample window. Deterministic.
pub fn analyze_posture(samples: &[BiometricSample]) -> PostureAnalysis {
    let bad_posture_count = samples
        .iter()
        .filter(|s| s.posture == Posture::Hunched)
        .count();

    let good_posture_percentage = if samples.is_empty() {
        100.0
    } else {
        (samples.len() - bad_posture_count) as f64 / samples.len() as f64 * 100.0
    };

    let needs_improvement = bad_posture_count > BAD_POSTURE_COUNT_THRESHOLD
        || good_posture_percentage < GOOD_POSTURE_PERCENT_THRESHOLD;

    let mut recommendations = Vec::new();
    if good_posture_percentage < GOOD_POSTURE_PERCENT_THRESHOLD {
        recommendations.push("Posture is slipping often; a lumbar support cushion can help".into());
    }
    if bad_posture_count > BAD_POSTURE_COUNT_THRESHOLD {
        recommendations.push("Frequent hunching detected; set a recurring posture reminder".into());
        recommendations.push("Stand up and move for five minutes every hour".into());
    }
    recommendations.push("Align chair and monitor height so you look straight ahead".into());

    PostureAnalysis {
        good_posture_percentage,
        bad_posture_count,
        needs_improvement,
        recommendations,
    }
}

/// Environment analysis over a sample window: per-axis means plus the
/// assessment of those means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentAnalysis {
    pub average_illuminance: f64,
    pub average_temperature: f64,
    pub average_humidity: f64,
    pub average_noise_level: f64,
    pub assessment: EnvironmentAssessment,
}

/// Summarize an environment sample window. Returns `None` for an empty
/// window — there is nothing meaningful to average.
pub fn summarize_environment(samples: &[EnvironmentSample]) -> Option<EnvironmentAnalysis> {
    if samples.is_empty() {
        return None;
    }

    let n = samples.len() as f64;
    let average_illuminance = samples.iter().map(|s| s.illuminance).sum::<f64>() / n;
    let average_temperature = samples.iter().map(|s| s.temperature).sum::<f64>() / n;
    let average_humidity = samples.iter().map(|s| s.humidity).sum::<f64>() / n;
    let average_noise_level = samples.iter().map(|s| s.noise_level).sum::<f64>() / n;

    let assessment = classify_environment(&EnvironmentReading {
        illuminance: average_illuminance,
        temperature: average_temperature,
        humidity: average_humidity,
        noise_level: average_noise_level,
    });

    Some(EnvironmentAnalysis {
        average_illuminance,
        average_temperature,
        average_humidity,
        average_noise_level,
        assessment,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;
    use chrono::Utc;

    fn biometric(hrv: f64, posture: Posture) -> BiometricSample {
        BiometricSample {
            user_id: 1,
            session_id: None,
            timestamp: Utc::now(),
            heart_rate: 72.0,
            hrv,
            posture,
            movement_frequency: 2.0,
        }
    }

    fn environment(illuminance: f64, noise_level: f64) -> EnvironmentSample {
        environment_full(illuminance, 23.0, 45.0, noise_level)
    }

    fn environment_full(
        illuminance: f64,
        temperature: f64,
        humidity: f64,
        noise_level: f64,
    ) -> EnvironmentSample {
        EnvironmentSample {
            device_id: 1,
            session_id: None,
            timestamp: Utc::now(),
            illuminance,
            temperature,
            humidity,
            noise_level,
        }
    }

    fn at(ts: Timestamp, sample: EnvironmentSample) -> EnvironmentSample {
        EnvironmentSample {
            timestamp: ts,
            ..sample
        }
    }

    // -- compute_focus_score --

    #[test]
    fn perfect_conditions_score_100() {
        let result = compute_focus_score(
            Some(&biometric(50.0, Posture::Good)),
            Some(&environment(500.0, 40.0)),
        );
        assert_eq!(result.score, 100);
        assert!(result.contributing_factors.is_empty());
    }

    #[test]
    fn all_bad_conditions_score_exactly_45() {
        let result = compute_focus_score(
            Some(&biometric(150.0, Posture::Hunched)),
            Some(&environment(100.0, 80.0)),
        );
        assert_eq!(result.score, 45);
        assert_eq!(
            result.contributing_factors,
            vec![
                FocusFactor::ElevatedHrv,
                FocusFactor::HunchedPosture,
                FocusFactor::ExcessNoise,
                FocusFactor::DimLighting,
            ]
        );
    }

    #[test]
    fn missing_biometric_scores_zero() {
        let result = compute_focus_score(None, Some(&environment(500.0, 40.0)));
        assert_eq!(result.score, 0);
        assert!(result.contributing_factors.is_empty());
    }

    #[test]
    fn missing_environment_scores_zero() {
        let result = compute_focus_score(Some(&biometric(50.0, Posture::Good)), None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn both_inputs_missing_scores_zero() {
        assert_eq!(compute_focus_score(None, None).score, 0);
    }

    #[test]
    fn threshold_boundaries_apply_no_penalty() {
        // Exactly at each threshold: no penalty (strict comparisons).
        let result = compute_focus_score(
            Some(&biometric(100.0, Posture::Good)),
            Some(&environment(200.0, 70.0)),
        );
        assert_eq!(result.score, 100);
    }

    #[test]
    fn score_always_within_bounds() {
        for hrv in [0.0, 101.0] {
            for posture in [Posture::Good, Posture::Hunched] {
                for noise in [30.0, 80.0] {
                    for lux in [50.0, 500.0] {
                        let result = compute_focus_score(
                            Some(&biometric(hrv, posture)),
                            Some(&environment(lux, noise)),
                        );
                        assert!(result.score <= 100);
                    }
                }
            }
        }
    }

    // -- classification bands --

    #[test]
    fn light_250_lux_is_too_dark() {
        assert_eq!(LightQuality::classify(250.0), LightQuality::TooDark);
    }

    #[test]
    fn light_1500_lux_is_too_bright() {
        assert_eq!(LightQuality::classify(1500.0), LightQuality::TooBright);
    }

    #[test]
    fn light_500_lux_is_optimal() {
        assert_eq!(LightQuality::classify(500.0), LightQuality::Optimal);
    }

    #[test]
    fn noise_bands() {
        assert_eq!(NoiseQuality::classify(30.0), NoiseQuality::Quiet);
        assert_eq!(NoiseQuality::classify(50.0), NoiseQuality::Moderate);
        assert_eq!(NoiseQuality::classify(70.0), NoiseQuality::Noisy);
    }

    #[test]
    fn temperature_bands() {
        assert_eq!(TemperatureQuality::classify(18.0), TemperatureQuality::Cold);
        assert_eq!(
            TemperatureQuality::classify(22.0),
            TemperatureQuality::Comfortable
        );
        assert_eq!(TemperatureQuality::classify(28.0), TemperatureQuality::Hot);
    }

    #[test]
    fn humidity_bands() {
        assert_eq!(HumidityQuality::classify(25.0), HumidityQuality::Dry);
        assert_eq!(HumidityQuality::classify(45.0), HumidityQuality::Comfortable);
        assert_eq!(HumidityQuality::classify(70.0), HumidityQuality::Humid);
    }

    #[test]
    fn ventilation_advisory_always_appended_last() {
        let reading = EnvironmentReading {
            illuminance: 500.0,
            temperature: 23.0,
            humidity: 45.0,
            noise_level: 40.0,
        };
        let assessment = classify_environment(&reading);
        assert_eq!(assessment.recommendations, vec![VENTILATION_ADVISORY]);
    }

    #[test]
    fn bad_environment_yields_one_advisory_per_axis() {
        let sample = environment_full(50.0, 30.0, 80.0, 80.0);
        let assessment = classify_environment(&EnvironmentReading::from(&sample));
        assert_eq!(assessment.light, LightQuality::TooDark);
        assert_eq!(assessment.noise, NoiseQuality::Noisy);
        assert_eq!(assessment.temperature, TemperatureQuality::Hot);
        assert_eq!(assessment.humidity, HumidityQuality::Humid);
        // 4 axis advisories + ventilation.
        assert_eq!(assessment.recommendations.len(), 5);
        assert_eq!(
            assessment.recommendations.last().map(String::as_str),
            Some(VENTILATION_ADVISORY)
        );
    }

    // -- analyze_posture --

    #[test]
    fn empty_posture_window_counts_as_good() {
        let analysis = analyze_posture(&[]);
        assert_eq!(analysis.good_posture_percentage, 100.0);
        assert_eq!(analysis.bad_posture_count, 0);
        assert!(!analysis.needs_improvement);
    }

    #[test]
    fn mostly_hunched_window_needs_improvement() {
        let samples: Vec<_> = (0..10)
            .map(|i| {
                biometric(
                    50.0,
                    if i < 7 { Posture::Hunched } else { Posture::Good },
                )
            })
            .collect();
        let analysis = analyze_posture(&samples);
        assert_eq!(analysis.bad_posture_count, 7);
        assert!((analysis.good_posture_percentage - 30.0).abs() < f64::EPSILON);
        assert!(analysis.needs_improvement);
        // Both threshold advisories plus the always-on one.
        assert_eq!(analysis.recommendations.len(), 4);
    }

    #[test]
    fn good_posture_window_gets_baseline_advice_only() {
        let samples = vec![biometric(50.0, Posture::Good); 10];
        let analysis = analyze_posture(&samples);
        assert!(!analysis.needs_improvement);
        assert_eq!(analysis.recommendations.len(), 1);
    }

    // -- summarize_environment --

    #[test]
    fn empty_environment_window_yields_none() {
        assert_eq!(summarize_environment(&[]), None);
    }

    #[test]
    fn environment_summary_averages_and_classifies() {
        let base = Utc::now();
        let samples = vec![
            at(base, environment_full(400.0, 22.0, 40.0, 30.0)),
            at(base, environment_full(600.0, 24.0, 50.0, 50.0)),
        ];
        let analysis = summarize_environment(&samples).expect("non-empty window");
        assert!((analysis.average_illuminance - 500.0).abs() < 1e-9);
        assert!((analysis.average_temperature - 23.0).abs() < 1e-9);
        assert!((analysis.average_humidity - 45.0).abs() < 1e-9);
        assert!((analysis.average_noise_level - 40.0).abs() < 1e-9);
        assert_eq!(analysis.assessment.light, LightQuality::Optimal);
        assert_eq!(analysis.assessment.noise, NoiseQuality::Moderate);
    }
}
