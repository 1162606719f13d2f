//! Metrics engine
//!
//! Read-only derivation layer over the event store. Nothing here writes;
//! every number is recomputed from the stored events on demand, so
//! results always reflect the latest state of a session.
//!
//! - [`phases`]: slices a session into named phases from milestone pairs
//! - [`session`]: folds one session's event streams into `SessionMetrics`
//! - [`compare`]: compares two tools' completed-session cohorts
//! - [`summary`]: descriptive statistics over a cohort

pub mod compare;
pub mod phases;
pub mod session;
pub mod summary;

pub use compare::{ComparisonMetrics, PreferenceWinner};
pub use phases::{segment_phases, Phase, PhaseSegmentation};
pub use session::SessionMetrics;
pub use summary::{DistributionSummary, SatisfactionSummary, SummaryStats};

use crate::config::ComparisonConfig;
use crate::db::Database;
use crate::error::Result;

/// Facade over the derivation functions, carrying the store handle and
/// comparison settings.
pub struct MetricsEngine<'a> {
    db: &'a Database,
    comparison: ComparisonConfig,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(db: &'a Database, comparison: ComparisonConfig) -> Self {
        Self { db, comparison }
    }

    /// Aggregate one session. Fails only for an unknown session id.
    pub fn session_metrics(&self, session_id: i64) -> Result<SessionMetrics> {
        session::compute(self.db, session_id)
    }

    /// Compare two tools over completed sessions, optionally within one
    /// scenario. `None` when either side has no completed session.
    pub fn compare_tools(
        &self,
        tool_a: &str,
        tool_b: &str,
        scenario_type: Option<&str>,
    ) -> Result<Option<ComparisonMetrics>> {
        compare::compute(self.db, &self.comparison, tool_a, tool_b, scenario_type)
    }

    /// Summarize completed sessions matching the filters. `None` when
    /// nothing matches.
    pub fn summary_stats(
        &self,
        tool_name: Option<&str>,
        scenario_type: Option<&str>,
    ) -> Result<Option<SummaryStats>> {
        summary::compute(self.db, tool_name, scenario_type)
    }
}
