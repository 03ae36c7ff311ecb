//! Historical aggregation: study reports and derived insights.
//!
//! Pure functions over caller-supplied windows of sessions and samples.
//! Nothing here is persisted; outputs are value objects and persistence,
//! if desired, is the caller's concern.

use chrono::Timelike;
use serde::Serialize;

use crate::samples::{BiometricSample, EnvironmentSample};
use crate::scoring::{self, EnvironmentAnalysis, PostureAnalysis};
use crate::session::StudySession;

/// Average focus score below which a break-cadence advisory is emitted.
pub const FOCUS_BREAK_THRESHOLD: f64 = 70.0;

/// Sum of completed-session durations in minutes.
///
/// Sessions without an end time contribute 0 — an unfinished session has
/// no measurable study time yet.
pub fn total_study_minutes(sessions: &[StudySession]) -> f64 {
    sessions
        .iter()
        .filter_map(StudySession::duration_secs)
        .map(|secs| secs as f64 / 60.0)
        .sum()
}

/// Mean focus score over the sessions that carry one.
///
/// Returns 0.0 for an empty set; never divides by zero.
pub fn average_focus_score(sessions: &[StudySession]) -> f64 {
    let scores: Vec<f64> = sessions
        .iter()
        .filter_map(|s| s.focus_score)
        .map(f64::from)
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Aggregate study report over a historical window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyReport {
    pub total_study_minutes: f64,
    pub average_focus_score: f64,
    pub posture_summary: PostureAnalysis,
    /// `None` when no environment samples fell inside the window.
    pub environment_summary: Option<EnvironmentAnalysis>,
    pub recommendations: Vec<String>,
}

/// Build a study report from session history and sample windows.
///
/// Recommendations are assembled by independently evaluating the focus
/// average, the posture summary, and each environment axis against the
/// fixed thresholds, one advisory per violation.
pub fn generate_report(
    sessions: &[StudySession],
    biometric: &[BiometricSample],
    environment: &[EnvironmentSample],
) -> StudyReport {
    let total = total_study_minutes(sessions);
    let average = average_focus_score(sessions);
    let posture = scoring::analyze_posture(biometric);
    let summary = scoring::summarize_environment(environment);

    let mut recommendations = Vec::new();
    if average < FOCUS_BREAK_THRESHOLD {
        recommendations
            .push("Focus is dropping; take a five minute break every 45 minutes of study".into());
    }
    if posture.needs_improvement {
        recommendations
            .push("Watch your sitting posture; a chair with good neck support helps".into());
    }
    if let Some(ref env) = summary {
        let advisories = [
            env.assessment.noise.advisory(),
            env.assessment.light.advisory(),
            env.assessment.temperature.advisory(),
            env.assessment.humidity.advisory(),
        ];
        recommendations.extend(advisories.into_iter().flatten().map(String::from));
    }

    StudyReport {
        total_study_minutes: total,
        average_focus_score: average,
        posture_summary: posture,
        environment_summary: summary,
        recommendations,
    }
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// Category of a derived insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Focus,
    Schedule,
}

/// One derived observation about a user's study history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

/// Derive insights from recent completed sessions.
///
/// All figures come from the actual session history: the average completed
/// session length and the hour of day sessions most often start. Sessions
/// without an end time are ignored; an empty history yields no insights.
pub fn session_insights(sessions: &[StudySession]) -> Vec<Insight> {
    let completed: Vec<&StudySession> = sessions
        .iter()
        .filter(|s| s.end_time.is_some())
        .collect();
    if completed.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::new();

    let total_minutes: f64 = completed
        .iter()
        .filter_map(|s| s.duration_secs())
        .map(|secs| secs as f64 / 60.0)
        .sum();
    let average_minutes = total_minutes / completed.len() as f64;
    insights.push(Insight {
        kind: InsightKind::Focus,
        title: "Focus span".into(),
        description: format!(
            "Your completed sessions average {average_minutes:.0} minutes; \
             sessions around 45 minutes with short breaks tend to hold focus best"
        ),
    });

    // Most frequent start hour; earliest hour wins ties.
    let mut counts = [0usize; 24];
    for session in &completed {
        counts[session.start_time.hour() as usize] += 1;
    }
    let peak_hour = counts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(hour, _)| hour)
        .unwrap_or(0);
    insights.push(Insight {
        kind: InsightKind::Schedule,
        title: "Study rhythm".into(),
        description: format!(
            "You most often start studying around {peak_hour:02}:00 UTC; \
             protect that slot for your most demanding work"
        ),
    });

    insights
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStatus;
    use crate::types::Timestamp;
    use chrono::{Duration, TimeZone, Utc};

    fn session(start: Timestamp, end: Option<Timestamp>, focus_score: Option<u8>) -> StudySession {
        StudySession {
            id: 1,
            task_id: 1,
            user_id: 7,
            start_time: start,
            end_time: end,
            status: if end.is_some() {
                SessionStatus::Completed
            } else {
                SessionStatus::Active
            },
            interruptions: Vec::new(),
            focus_score,
        }
    }

    fn at(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    // -- total_study_minutes --

    #[test]
    fn unfinished_sessions_contribute_zero_minutes() {
        let start = at(9);
        let sessions = vec![
            session(start, Some(start + Duration::seconds(600)), Some(80)),
            session(start, None, None),
        ];
        assert!((total_study_minutes(&sessions) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn total_minutes_of_empty_set_is_zero() {
        assert_eq!(total_study_minutes(&[]), 0.0);
    }

    // -- average_focus_score --

    #[test]
    fn average_of_empty_set_is_zero() {
        assert_eq!(average_focus_score(&[]), 0.0);
    }

    #[test]
    fn average_ignores_unscored_sessions() {
        let start = at(9);
        let sessions = vec![
            session(start, Some(start + Duration::seconds(60)), Some(80)),
            session(start, Some(start + Duration::seconds(60)), Some(60)),
            session(start, None, None),
        ];
        assert!((average_focus_score(&sessions) - 70.0).abs() < 1e-9);
    }

    // -- generate_report --

    #[test]
    fn report_on_empty_windows_has_defaults() {
        let report = generate_report(&[], &[], &[]);
        assert_eq!(report.total_study_minutes, 0.0);
        assert_eq!(report.average_focus_score, 0.0);
        assert_eq!(report.environment_summary, None);
        // Average 0 is below the break threshold.
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("five minute break")));
    }

    #[test]
    fn report_with_high_scores_omits_break_advisory() {
        let start = at(9);
        let sessions = vec![session(start, Some(start + Duration::seconds(1800)), Some(90))];
        let report = generate_report(&sessions, &[], &[]);
        assert!((report.average_focus_score - 90.0).abs() < 1e-9);
        assert!(!report
            .recommendations
            .iter()
            .any(|r| r.contains("five minute break")));
    }

    #[test]
    fn report_emits_one_advisory_per_violated_environment_axis() {
        use crate::samples::EnvironmentSample;

        let samples = vec![EnvironmentSample {
            device_id: 1,
            session_id: None,
            timestamp: at(9),
            illuminance: 50.0,
            temperature: 30.0,
            humidity: 80.0,
            noise_level: 80.0,
        }];
        let start = at(9);
        let sessions = vec![session(start, Some(start + Duration::seconds(60)), Some(95))];
        let report = generate_report(&sessions, &[], &samples);

        // Noise, light, temperature, humidity all violated; posture and
        // focus are fine.
        assert_eq!(report.recommendations.len(), 4);
    }

    // -- session_insights --

    #[test]
    fn no_completed_sessions_yield_no_insights() {
        assert!(session_insights(&[]).is_empty());
        assert!(session_insights(&[session(at(9), None, None)]).is_empty());
    }

    #[test]
    fn insights_report_average_length_and_peak_hour() {
        let sessions = vec![
            session(at(9), Some(at(9) + Duration::seconds(1800)), Some(80)),
            session(at(9), Some(at(9) + Duration::seconds(3600)), Some(70)),
            session(at(14), Some(at(14) + Duration::seconds(900)), Some(60)),
        ];
        let insights = session_insights(&sessions);
        assert_eq!(insights.len(), 2);

        assert_eq!(insights[0].kind, InsightKind::Focus);
        // (30 + 60 + 15) / 3 = 35 minutes.
        assert!(insights[0].description.contains("35 minutes"));

        assert_eq!(insights[1].kind, InsightKind::Schedule);
        assert!(insights[1].description.contains("09:00"));
    }
}
