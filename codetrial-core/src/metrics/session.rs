//! Per-session metric aggregation
//!
//! Reads every event stream of one session from the store and folds it
//! into a single `SessionMetrics` record. The only hard failure is an
//! unknown session id; empty event streams degrade to zeros and missing
//! feedback stays `None`.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{BuildKind, ChangeKind, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::phases::segment_phases;
use super::summary::mean;

/// Aggregated view of one session.
///
/// Rate metrics with a zero denominator report 0.0; that is an expected
/// state, not an error. Feedback fields stay `None` when no feedback was
/// recorded, so "no opinion" and "rated zero" remain distinguishable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetrics {
    // Identity
    pub session_id: i64,
    pub session_name: String,
    pub tool_name: String,
    pub scenario_type: String,
    pub developer_id: Option<String>,
    pub status: SessionStatus,

    // Timing
    pub start_time: DateTime<Utc>,
    /// Effective end: the recorded end, or "now" for open sessions
    pub end_time: DateTime<Utc>,
    pub total_duration_minutes: f64,

    // Code volume
    pub total_code_changes: i64,
    pub files_created: i64,
    pub files_modified: i64,
    pub files_deleted: i64,
    /// Distinct file paths touched
    pub unique_files: i64,
    pub lines_added: i64,
    pub lines_deleted: i64,
    pub lines_modified: i64,
    pub ai_generated_changes: i64,

    // AI usage
    pub total_ai_interactions: i64,
    pub ai_interactions_per_hour: f64,
    /// Mean quality rating over the rated interactions only; 0.0 when
    /// nothing was rated
    pub average_quality_rating: f64,
    pub helpful_interactions_percentage: f64,
    pub total_tokens_used: i64,
    pub total_cost_estimate: f64,

    // Phases
    pub total_phases: i64,
    pub phase_durations: BTreeMap<String, f64>,
    pub phase_ai_usage: BTreeMap<String, i64>,
    /// Phases started but never completed, in start order
    pub open_phases: Vec<String>,

    // Productivity
    /// Lines added per minute of session time
    pub lines_per_minute: f64,
    /// Distinct files touched per hour of session time
    pub files_per_hour: f64,
    /// Interactions as a share of all recorded activity:
    /// interactions / (interactions + changes)
    pub ai_assistance_ratio: f64,

    // Quality
    /// Percentage of builds that succeeded
    pub build_success_rate: f64,
    /// Percentage of test cases that passed, over test builds only
    pub test_pass_rate: f64,
    /// Arithmetic mean of build success rate and test pass rate
    pub code_quality_score: f64,

    // Feedback
    pub satisfaction_rating: Option<i32>,
    pub ease_of_use_rating: Option<i32>,
    pub productivity_rating: Option<i32>,
    pub would_recommend: Option<bool>,
}

/// Aggregate all event streams of one session.
pub fn compute(db: &Database, session_id: i64) -> Result<SessionMetrics> {
    let session = db
        .get_session(session_id)?
        .ok_or(Error::SessionNotFound(session_id))?;

    let interactions = db.interactions_for_session(session_id)?;
    let changes = db.changes_for_session(session_id)?;
    let milestones = db.milestones_for_session(session_id)?;
    let builds = db.builds_for_session(session_id)?;
    let feedback = db.feedback_for_session(session_id)?;

    let end_time = session.ended_at.unwrap_or_else(Utc::now);
    let total_duration_minutes = (end_time
        .signed_duration_since(session.started_at)
        .num_seconds()
        .max(0) as f64)
        / 60.0;
    let duration_hours = total_duration_minutes / 60.0;

    // Code volume
    let count_kind = |kind: ChangeKind| -> i64 {
        changes.iter().filter(|c| c.change_kind == kind).count() as i64
    };
    let unique_files = changes
        .iter()
        .map(|c| c.file_path.as_str())
        .collect::<HashSet<_>>()
        .len() as i64;
    let lines_added: i64 = changes.iter().map(|c| c.lines_added).sum();
    let lines_deleted: i64 = changes.iter().map(|c| c.lines_deleted).sum();
    let lines_modified: i64 = changes.iter().map(|c| c.lines_modified).sum();
    let ai_generated_changes = changes.iter().filter(|c| c.ai_generated).count() as i64;

    // AI usage
    let total_ai_interactions = interactions.len() as i64;
    let ratings: Vec<f64> = interactions
        .iter()
        .filter_map(|i| i.quality_rating)
        .map(f64::from)
        .collect();
    let average_quality_rating = mean(&ratings);

    let helpful_count = interactions
        .iter()
        .filter(|i| i.was_helpful == Some(true))
        .count();
    let helpful_interactions_percentage = if total_ai_interactions > 0 {
        helpful_count as f64 / total_ai_interactions as f64 * 100.0
    } else {
        0.0
    };

    let total_tokens_used: i64 = interactions.iter().filter_map(|i| i.tokens_used).sum();
    let total_cost_estimate: f64 = interactions.iter().filter_map(|i| i.cost_estimate).sum();

    // Phases
    let segmentation = segment_phases(&milestones, &interactions, &changes);

    // Productivity
    let activity = interactions.len() + changes.len();
    let ai_assistance_ratio = if activity > 0 {
        interactions.len() as f64 / activity as f64
    } else {
        0.0
    };
    let per_minute = |value: f64| {
        if total_duration_minutes > 0.0 {
            value / total_duration_minutes
        } else {
            0.0
        }
    };
    let per_hour = |value: f64| {
        if duration_hours > 0.0 {
            value / duration_hours
        } else {
            0.0
        }
    };

    // Quality
    let total_builds = builds.len();
    let successful_builds = builds.iter().filter(|b| b.success).count();
    let build_success_rate = if total_builds > 0 {
        successful_builds as f64 / total_builds as f64 * 100.0
    } else {
        0.0
    };

    let test_builds: Vec<_> = builds
        .iter()
        .filter(|b| b.build_kind == BuildKind::Test)
        .collect();
    let tests_passed: i64 = test_builds.iter().filter_map(|b| b.tests_passed).sum();
    let tests_failed: i64 = test_builds.iter().filter_map(|b| b.tests_failed).sum();
    let tests_total = tests_passed + tests_failed;
    let test_pass_rate = if tests_total > 0 {
        tests_passed as f64 / tests_total as f64 * 100.0
    } else {
        0.0
    };

    let code_quality_score = (build_success_rate + test_pass_rate) / 2.0;

    Ok(SessionMetrics {
        session_id,
        session_name: session.name,
        tool_name: session.tool_name,
        scenario_type: session.scenario_type,
        developer_id: session.developer_id,
        status: session.status,
        start_time: session.started_at,
        end_time,
        total_duration_minutes,
        total_code_changes: changes.len() as i64,
        files_created: count_kind(ChangeKind::Create),
        files_modified: count_kind(ChangeKind::Modify),
        files_deleted: count_kind(ChangeKind::Delete),
        unique_files,
        lines_added,
        lines_deleted,
        lines_modified,
        ai_generated_changes,
        total_ai_interactions,
        ai_interactions_per_hour: per_hour(total_ai_interactions as f64),
        average_quality_rating,
        helpful_interactions_percentage,
        total_tokens_used,
        total_cost_estimate,
        total_phases: segmentation.phase_count() as i64,
        phase_durations: segmentation.durations(),
        phase_ai_usage: segmentation.ai_usage(),
        open_phases: segmentation.open_phases,
        lines_per_minute: per_minute(lines_added as f64),
        files_per_hour: per_hour(unique_files as f64),
        ai_assistance_ratio,
        build_success_rate,
        test_pass_rate,
        code_quality_score,
        satisfaction_rating: feedback.as_ref().and_then(|f| f.overall_satisfaction),
        ease_of_use_rating: feedback.as_ref().and_then(|f| f.ease_of_use_rating),
        productivity_rating: feedback.as_ref().and_then(|f| f.productivity_rating),
        would_recommend: feedback.as_ref().and_then(|f| f.would_recommend),
    })
}
