//! Phase segmentation from paired start/complete milestones.
//!
//! Sessions are sliced into named development phases by `phase_start_X` /
//! `phase_complete_X` milestone pairs. Segmentation is a single scan over
//! the timestamp-ordered milestone list:
//!
//! - a repeated `phase_start_X` with no intervening complete supersedes the
//!   earlier start (last-start-wins)
//! - a `phase_complete_X` with no open start is ignored
//! - a complete timestamped before its start is clamped to zero duration
//!   and logged as an anomaly
//!
//! Unmatched starts are reported as open phases with no duration. Activity
//! counts per resolved phase come from an O(phases x events) scan over the
//! session's interactions and changes; fine at session scale.

use crate::types::{AiInteraction, CodeChange, Milestone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A resolved development phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    /// Phase name (without the milestone prefix)
    pub name: String,
    /// When the phase opened
    pub start_time: DateTime<Utc>,
    /// When the phase closed
    pub end_time: DateTime<Utc>,
    /// Phase length in minutes (never negative)
    pub duration_minutes: f64,
    /// AI interactions whose timestamp falls within the phase, inclusive
    pub ai_interaction_count: i64,
    /// Code changes whose timestamp falls within the phase, inclusive
    pub code_change_count: i64,
}

/// Result of segmenting one session's milestones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseSegmentation {
    /// Resolved phases by name
    pub phases: BTreeMap<String, Phase>,
    /// Phases with a start but no complete, in start order
    pub open_phases: Vec<String>,
}

impl PhaseSegmentation {
    /// Number of resolved phases.
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Phase name -> duration in minutes.
    pub fn durations(&self) -> BTreeMap<String, f64> {
        self.phases
            .iter()
            .map(|(name, phase)| (name.clone(), phase.duration_minutes))
            .collect()
    }

    /// Phase name -> AI interaction count.
    pub fn ai_usage(&self) -> BTreeMap<String, i64> {
        self.phases
            .iter()
            .map(|(name, phase)| (name.clone(), phase.ai_interaction_count))
            .collect()
    }
}

/// Segment a session's milestones into phases.
///
/// `milestones` must be ordered by timestamp (the store returns them that
/// way). Interactions and changes are only consulted for activity counts.
pub fn segment_phases(
    milestones: &[Milestone],
    interactions: &[AiInteraction],
    changes: &[CodeChange],
) -> PhaseSegmentation {
    // Most recent unmatched start per phase name
    let mut open_starts: HashMap<String, DateTime<Utc>> = HashMap::new();
    let mut open_order: Vec<String> = Vec::new();
    let mut phases: BTreeMap<String, Phase> = BTreeMap::new();

    for milestone in milestones {
        if let Some(name) = milestone.phase_started() {
            if open_starts
                .insert(name.to_string(), milestone.timestamp)
                .is_none()
            {
                open_order.push(name.to_string());
            }
        } else if let Some(name) = milestone.phase_completed() {
            let Some(start) = open_starts.remove(name) else {
                // Complete without an open start carries no meaning
                continue;
            };
            open_order.retain(|n| n != name);

            let span = milestone.timestamp.signed_duration_since(start);
            let duration_minutes = if span < chrono::Duration::zero() {
                tracing::warn!(
                    phase = name,
                    start = %start,
                    complete = %milestone.timestamp,
                    "Phase completed before it started; recording zero duration"
                );
                0.0
            } else {
                span.num_seconds() as f64 / 60.0
            };

            let window_end = milestone.timestamp.max(start);
            phases.insert(
                name.to_string(),
                Phase {
                    name: name.to_string(),
                    start_time: start,
                    end_time: milestone.timestamp,
                    duration_minutes,
                    ai_interaction_count: count_in_window(
                        interactions.iter().map(|i| i.timestamp),
                        start,
                        window_end,
                    ),
                    code_change_count: count_in_window(
                        changes.iter().map(|c| c.timestamp),
                        start,
                        window_end,
                    ),
                },
            );
        }
    }

    PhaseSegmentation {
        phases,
        open_phases: open_order,
    }
}

fn count_in_window(
    timestamps: impl Iterator<Item = DateTime<Utc>>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> i64 {
    timestamps.filter(|ts| *ts >= start && *ts <= end).count() as i64
}
