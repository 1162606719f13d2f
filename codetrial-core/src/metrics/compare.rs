//! Cross-session tool comparison
//!
//! Compares two tools over their cohorts of completed sessions,
//! optionally restricted to one scenario type. Deltas are reported from
//! tool A's point of view: positive numbers mean A did better.
//!
//! Sign conventions:
//! - speed: `(mean_b - mean_a) / mean_b * 100` over durations, so a
//!   shorter mean duration for A is positive
//! - quality, productivity: `(mean_a - mean_b) / mean_b * 100`, so a
//!   higher mean for A is positive
//! - interactions, tokens, cost: raw mean difference `mean_a - mean_b`
//!
//! The preference winner comes from mean overall satisfaction with a
//! configurable deadband; differences inside the deadband are ties, as is
//! any comparison where either cohort has no feedback at all. The
//! deadband is a noise filter, not a significance test.

use crate::config::ComparisonConfig;
use crate::db::{Database, SessionFilter};
use crate::error::Result;
use serde::{Deserialize, Serialize};

use super::session::{self, SessionMetrics};
use super::summary::mean;

/// Which tool the developers preferred, by mean overall satisfaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceWinner {
    ToolA,
    ToolB,
    Tie,
}

impl std::fmt::Display for PreferenceWinner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceWinner::ToolA => write!(f, "tool_a"),
            PreferenceWinner::ToolB => write!(f, "tool_b"),
            PreferenceWinner::Tie => write!(f, "tie"),
        }
    }
}

/// Result of comparing two tools' completed-session cohorts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub tool_a: String,
    pub tool_b: String,
    /// Scenario restriction applied, if any
    pub scenario_type: Option<String>,
    /// Completed sessions behind each side
    pub sample_size_a: usize,
    pub sample_size_b: usize,

    /// Positive means tool A finished faster on average
    pub speed_improvement_percentage: f64,
    /// Positive means tool A produced higher code quality scores
    pub quality_difference_percentage: f64,
    /// Positive means tool A added more lines per minute
    pub productivity_difference_percentage: f64,

    /// Mean interactions per session, A minus B
    pub interaction_difference: f64,
    /// Mean tokens per session, A minus B
    pub token_difference: f64,
    /// Mean cost per session, A minus B
    pub cost_difference: f64,

    /// Mean overall satisfaction per side, where any was recorded
    pub satisfaction_a: Option<f64>,
    pub satisfaction_b: Option<f64>,
    pub preference_winner: PreferenceWinner,
}

/// Compare two tools. Returns `Ok(None)` when either tool has no
/// completed session in scope.
pub fn compute(
    db: &Database,
    config: &ComparisonConfig,
    tool_a: &str,
    tool_b: &str,
    scenario_type: Option<&str>,
) -> Result<Option<ComparisonMetrics>> {
    let cohort_a = cohort_metrics(db, tool_a, scenario_type)?;
    let cohort_b = cohort_metrics(db, tool_b, scenario_type)?;
    if cohort_a.is_empty() || cohort_b.is_empty() {
        tracing::debug!(
            tool_a,
            tool_b,
            sample_size_a = cohort_a.len(),
            sample_size_b = cohort_b.len(),
            "Comparison needs completed sessions on both sides"
        );
        return Ok(None);
    }

    let mean_of = |cohort: &[SessionMetrics], f: fn(&SessionMetrics) -> f64| -> f64 {
        mean(&cohort.iter().map(f).collect::<Vec<_>>())
    };

    let duration_a = mean_of(&cohort_a, |m| m.total_duration_minutes);
    let duration_b = mean_of(&cohort_b, |m| m.total_duration_minutes);
    let quality_a = mean_of(&cohort_a, |m| m.code_quality_score);
    let quality_b = mean_of(&cohort_b, |m| m.code_quality_score);
    let productivity_a = mean_of(&cohort_a, |m| m.lines_per_minute);
    let productivity_b = mean_of(&cohort_b, |m| m.lines_per_minute);

    let interactions_a = mean_of(&cohort_a, |m| m.total_ai_interactions as f64);
    let interactions_b = mean_of(&cohort_b, |m| m.total_ai_interactions as f64);
    let tokens_a = mean_of(&cohort_a, |m| m.total_tokens_used as f64);
    let tokens_b = mean_of(&cohort_b, |m| m.total_tokens_used as f64);
    let cost_a = mean_of(&cohort_a, |m| m.total_cost_estimate);
    let cost_b = mean_of(&cohort_b, |m| m.total_cost_estimate);

    let satisfaction_a = satisfaction_mean(&cohort_a);
    let satisfaction_b = satisfaction_mean(&cohort_b);
    let preference_winner = pick_winner(satisfaction_a, satisfaction_b, config.preference_deadband);

    Ok(Some(ComparisonMetrics {
        tool_a: tool_a.to_string(),
        tool_b: tool_b.to_string(),
        scenario_type: scenario_type.map(String::from),
        sample_size_a: cohort_a.len(),
        sample_size_b: cohort_b.len(),
        speed_improvement_percentage: pct_of(duration_b - duration_a, duration_b),
        quality_difference_percentage: pct_of(quality_a - quality_b, quality_b),
        productivity_difference_percentage: pct_of(productivity_a - productivity_b, productivity_b),
        interaction_difference: interactions_a - interactions_b,
        token_difference: tokens_a - tokens_b,
        cost_difference: cost_a - cost_b,
        satisfaction_a,
        satisfaction_b,
        preference_winner,
    }))
}

fn cohort_metrics(
    db: &Database,
    tool_name: &str,
    scenario_type: Option<&str>,
) -> Result<Vec<SessionMetrics>> {
    let sessions =
        db.list_sessions(&SessionFilter::completed_for_tool(tool_name, scenario_type))?;
    sessions
        .iter()
        .map(|s| session::compute(db, s.id))
        .collect()
}

/// Mean satisfaction over the sessions that carry feedback.
fn satisfaction_mean(cohort: &[SessionMetrics]) -> Option<f64> {
    let ratings: Vec<f64> = cohort
        .iter()
        .filter_map(|m| m.satisfaction_rating.map(f64::from))
        .collect();
    (!ratings.is_empty()).then(|| mean(&ratings))
}

/// Percentage of a baseline; 0.0 when the baseline is zero.
fn pct_of(diff: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        diff / baseline * 100.0
    }
}

fn pick_winner(a: Option<f64>, b: Option<f64>, deadband: f64) -> PreferenceWinner {
    match (a, b) {
        (Some(a), Some(b)) => {
            let diff = a - b;
            if diff.abs() <= deadband {
                PreferenceWinner::Tie
            } else if diff > 0.0 {
                PreferenceWinner::ToolA
            } else {
                PreferenceWinner::ToolB
            }
        }
        // No basis for a preference call without ratings on both sides
        _ => PreferenceWinner::Tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewCodeChange;
    use crate::types::{ChangeKind, DeveloperFeedback, NewSession, SessionStatus};
    use chrono::{Duration, Utc};

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    /// One completed session: fixed duration, lines added, satisfaction.
    fn seed_session(
        db: &Database,
        tool: &str,
        minutes: i64,
        lines: i64,
        satisfaction: Option<i32>,
    ) -> i64 {
        let start = Utc::now() - Duration::hours(2);
        let id = db
            .create_session(&NewSession {
                name: format!("{}-run", tool),
                tool_name: tool.to_string(),
                scenario_type: "bug_fix".to_string(),
                developer_id: None,
                started_at: Some(start),
                notes: None,
            })
            .unwrap();

        db.insert_code_change(
            id,
            &NewCodeChange {
                file_path: "src/lib.rs".to_string(),
                change_kind: ChangeKind::Modify,
                lines_added: lines,
                lines_deleted: 0,
                lines_modified: 0,
                ai_generated: false,
                timestamp: Some(start + Duration::minutes(5)),
            },
        )
        .unwrap();

        if let Some(rating) = satisfaction {
            db.upsert_feedback(&DeveloperFeedback {
                session_id: id,
                timestamp: Utc::now(),
                ease_of_use_rating: None,
                code_quality_rating: None,
                productivity_rating: None,
                learning_curve_rating: None,
                overall_satisfaction: Some(rating),
                would_recommend: None,
                likes: None,
                dislikes: None,
                suggestions: None,
            })
            .unwrap();
        }

        db.complete_session(
            id,
            SessionStatus::Completed,
            Some(start + Duration::minutes(minutes)),
        )
        .unwrap();
        id
    }

    #[test]
    fn test_empty_cohort_yields_none() {
        let db = test_db();
        seed_session(&db, "cursor", 30, 30, Some(4));

        let result = compute(&db, &ComparisonConfig::default(), "cursor", "copilot", None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_speed_and_productivity_signs() {
        let db = test_db();
        // cursor: 30 min, 60 lines; copilot: 40 min, 40 lines
        seed_session(&db, "cursor", 30, 60, None);
        seed_session(&db, "copilot", 40, 40, None);

        let cmp = compute(&db, &ComparisonConfig::default(), "cursor", "copilot", None)
            .unwrap()
            .unwrap();
        // (40 - 30) / 40 * 100
        assert!((cmp.speed_improvement_percentage - 25.0).abs() < 1e-9);
        // (2.0 - 1.0) / 1.0 * 100
        assert!((cmp.productivity_difference_percentage - 100.0).abs() < 1e-9);
        // No feedback anywhere
        assert_eq!(cmp.preference_winner, PreferenceWinner::Tie);
    }

    #[test]
    fn test_comparison_is_antisymmetric() {
        let db = test_db();
        seed_session(&db, "cursor", 30, 60, Some(5));
        seed_session(&db, "copilot", 40, 40, Some(3));

        let config = ComparisonConfig::default();
        let ab = compute(&db, &config, "cursor", "copilot", None)
            .unwrap()
            .unwrap();
        let ba = compute(&db, &config, "copilot", "cursor", None)
            .unwrap()
            .unwrap();

        assert_eq!(ab.preference_winner, PreferenceWinner::ToolA);
        assert_eq!(ba.preference_winner, PreferenceWinner::ToolB);
        assert!(ab.speed_improvement_percentage > 0.0);
        assert!(ba.speed_improvement_percentage < 0.0);
        assert_eq!(ab.interaction_difference, -ba.interaction_difference);
        assert_eq!(ab.sample_size_a, ba.sample_size_b);
    }

    #[test]
    fn test_deadband_controls_the_tie() {
        let db = test_db();
        // Satisfaction means differ by exactly 0.5
        seed_session(&db, "cursor", 30, 30, Some(4));
        seed_session(&db, "cursor", 30, 30, Some(5));
        seed_session(&db, "copilot", 30, 30, Some(4));

        // Difference equal to the deadband is still a tie
        let at_band = compute(
            &db,
            &ComparisonConfig {
                preference_deadband: 0.5,
            },
            "cursor",
            "copilot",
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(at_band.satisfaction_a, Some(4.5));
        assert_eq!(at_band.satisfaction_b, Some(4.0));
        assert_eq!(at_band.preference_winner, PreferenceWinner::Tie);

        let tight = compute(
            &db,
            &ComparisonConfig {
                preference_deadband: 0.4,
            },
            "cursor",
            "copilot",
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(tight.preference_winner, PreferenceWinner::ToolA);
    }

    #[test]
    fn test_scenario_restriction_narrows_cohorts() {
        let db = test_db();
        seed_session(&db, "cursor", 30, 30, None);
        seed_session(&db, "copilot", 30, 30, None);

        let result = compute(
            &db,
            &ComparisonConfig::default(),
            "cursor",
            "copilot",
            Some("new_feature"),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_zero_baseline_reports_zero_pct() {
        let db = test_db();
        // copilot produced no lines, so the productivity baseline is zero
        seed_session(&db, "cursor", 30, 30, None);
        seed_session(&db, "copilot", 30, 0, None);

        let cmp = compute(&db, &ComparisonConfig::default(), "cursor", "copilot", None)
            .unwrap()
            .unwrap();
        assert_eq!(cmp.productivity_difference_percentage, 0.0);
    }
}
