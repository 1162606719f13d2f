//! Cohort summary statistics
//!
//! Descriptive statistics (mean, median, min, max, sample standard
//! deviation) over the per-session metrics of a cohort. No inferential
//! statistics here; cohorts are far too small for that to be honest.

use crate::db::{Database, SessionFilter};
use crate::error::Result;
use crate::types::SessionStatus;
use serde::{Deserialize, Serialize};

use super::session;

/// Five-number-ish description of one metric across a cohort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; 0.0 when fewer than two values
    pub std_dev: f64,
}

impl DistributionSummary {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            mean: mean(values),
            median: median(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_dev: std_dev(values),
        }
    }
}

/// Mean satisfaction plus how many sessions contributed it, so a caller
/// can judge its reliability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatisfactionSummary {
    pub mean: f64,
    pub count: usize,
}

/// Descriptive statistics over a cohort of completed sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Tool filter applied, if any
    pub tool_name: Option<String>,
    /// Scenario filter applied, if any
    pub scenario_type: Option<String>,
    /// Number of completed sessions in the cohort
    pub total_sessions: usize,
    /// Session durations in minutes
    pub duration: DistributionSummary,
    /// AI interactions per session
    pub interactions: DistributionSummary,
    /// Lines added per minute
    pub productivity: DistributionSummary,
    /// Code quality scores
    pub quality: DistributionSummary,
    /// Overall satisfaction over the sessions that have feedback; None
    /// when no session in the cohort was rated
    pub satisfaction: Option<SatisfactionSummary>,
}

/// Arithmetic mean. 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median via sort; mean of the middle pair for even counts. 0.0 for an
/// empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Sample standard deviation (n - 1 denominator). 0.0 when fewer than two
/// values, since spread is undefined there.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Summarize the completed sessions matching the given filters.
///
/// Returns `Ok(None)` when no completed session matches.
pub fn compute(
    db: &Database,
    tool_name: Option<&str>,
    scenario_type: Option<&str>,
) -> Result<Option<SummaryStats>> {
    let filter = SessionFilter {
        tool_name: tool_name.map(String::from),
        scenario_type: scenario_type.map(String::from),
        status: Some(SessionStatus::Completed),
        limit: None,
    };
    let sessions = db.list_sessions(&filter)?;
    if sessions.is_empty() {
        return Ok(None);
    }

    let mut durations = Vec::with_capacity(sessions.len());
    let mut interactions = Vec::with_capacity(sessions.len());
    let mut productivity = Vec::with_capacity(sessions.len());
    let mut quality = Vec::with_capacity(sessions.len());
    let mut satisfaction = Vec::new();

    for s in &sessions {
        let metrics = session::compute(db, s.id)?;
        durations.push(metrics.total_duration_minutes);
        interactions.push(metrics.total_ai_interactions as f64);
        productivity.push(metrics.lines_per_minute);
        quality.push(metrics.code_quality_score);
        if let Some(rating) = metrics.satisfaction_rating {
            satisfaction.push(rating as f64);
        }
    }

    Ok(Some(SummaryStats {
        tool_name: tool_name.map(String::from),
        scenario_type: scenario_type.map(String::from),
        total_sessions: sessions.len(),
        duration: DistributionSummary::from_values(&durations),
        interactions: DistributionSummary::from_values(&interactions),
        productivity: DistributionSummary::from_values(&productivity),
        quality: DistributionSummary::from_values(&quality),
        satisfaction: if satisfaction.is_empty() {
            None
        } else {
            Some(SatisfactionSummary {
                mean: mean(&satisfaction),
                count: satisfaction.len(),
            })
        },
    }))
}
