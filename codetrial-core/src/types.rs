//! Core domain types for codetrial
//!
//! These types model one timed evaluation run of a developer using an AI
//! coding assistant on a scenario, plus the event records logged during it.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One timed evaluation run: one developer, one tool, one scenario |
//! | **Tool** | The AI coding assistant under evaluation ("cursor", "github_copilot", ...) |
//! | **Scenario** | The kind of task being performed ("bug_fix", "new_feature", "refactoring") |
//! | **Interaction** | One prompt/response cycle with the tool |
//! | **Milestone** | A named point in time during a session |
//! | **Phase** | A sub-interval bounded by paired `phase_start_X` / `phase_complete_X` milestones |
//! | **Cohort** | The completed sessions matching a tool/scenario filter |
//!
//! Derived records (`SessionMetrics`, `ComparisonMetrics`, `SummaryStats`)
//! live with the metrics engine in [`crate::metrics`]; everything here is
//! stored as-is in the event store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milestone name prefix that opens a phase.
pub const PHASE_START_PREFIX: &str = "phase_start_";
/// Milestone name prefix that closes a phase.
pub const PHASE_COMPLETE_PREFIX: &str = "phase_complete_";

/// Build the milestone name that opens the given phase.
pub fn phase_start_name(phase: &str) -> String {
    format!("{}{}", PHASE_START_PREFIX, phase)
}

/// Build the milestone name that closes the given phase.
pub fn phase_complete_name(phase: &str) -> String {
    format!("{}{}", PHASE_COMPLETE_PREFIX, phase)
}

// ============================================
// Sessions
// ============================================

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session is still being recorded
    InProgress,
    /// Session finished normally
    Completed,
    /// Session was abandoned or the task failed
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            "failed" => Ok(SessionStatus::Failed),
            _ => Err(format!("unknown session status: {}", s)),
        }
    }
}

/// One timed evaluation run of a developer using an AI tool on a scenario.
///
/// Mutated only at creation and at the explicit completion/failure
/// transition; all activity hangs off the session as child event records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Row id assigned by the store
    pub id: i64,
    /// Human-friendly name for the run
    pub name: String,
    /// Tool under evaluation
    pub tool_name: String,
    /// Scenario type ("bug_fix", "new_feature", "refactoring", ...)
    pub scenario_type: String,
    /// Who ran the session (optional)
    pub developer_id: Option<String>,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session ended; None while in progress
    pub ended_at: Option<DateTime<Utc>>,
    /// Lifecycle status
    pub status: SessionStatus,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Fields supplied when creating a session; the store assigns the id and
/// the `in_progress` status.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub name: String,
    pub tool_name: String,
    pub scenario_type: String,
    pub developer_id: Option<String>,
    /// Start time; None means "now"
    pub started_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

// ============================================
// AI interactions
// ============================================

/// One prompt/response cycle with the tool under evaluation.
///
/// Immutable once written. `sequence` is assigned by the writer and is
/// strictly increasing within a session; readers tolerate gaps but the
/// store rejects duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInteraction {
    /// Row id assigned by the store
    pub id: i64,
    /// Session this interaction belongs to
    pub session_id: i64,
    /// Order within the session
    pub sequence: i64,
    /// When the prompt was issued
    pub timestamp: DateTime<Utc>,
    /// The prompt text
    pub prompt_text: String,
    /// The tool's response, if captured
    pub response_text: Option<String>,
    /// Free-form kind ("code_generation", "explanation", "debug", ...)
    pub interaction_kind: Option<String>,
    /// Developer rating of the response, 1-5; None means unrated
    pub quality_rating: Option<i32>,
    /// Whether the developer judged the response helpful
    pub was_helpful: Option<bool>,
    /// Tokens consumed, if known
    pub tokens_used: Option<i64>,
    /// Monetary cost estimate, if known
    pub cost_estimate: Option<f64>,
}

// ============================================
// Code changes
// ============================================

/// Kind of file modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Create,
    Modify,
    Delete,
    Rename,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "create",
            ChangeKind::Modify => "modify",
            ChangeKind::Delete => "delete",
            ChangeKind::Rename => "rename",
        }
    }
}

impl std::str::FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ChangeKind::Create),
            "modify" => Ok(ChangeKind::Modify),
            "delete" => Ok(ChangeKind::Delete),
            "rename" => Ok(ChangeKind::Rename),
            _ => Err(format!("unknown change kind: {}", s)),
        }
    }
}

/// A file modification recorded during a session.
///
/// `ai_generated` is the one mutable field: a collaborator may
/// retroactively flag recent changes as AI-suggested once attribution is
/// known (see `Database::mark_recent_changes_ai`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChange {
    /// Row id assigned by the store
    pub id: i64,
    /// Session this change belongs to
    pub session_id: i64,
    /// Path of the touched file
    pub file_path: String,
    /// Kind of modification
    pub change_kind: ChangeKind,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
    /// Lines added (>= 0)
    pub lines_added: i64,
    /// Lines deleted (>= 0)
    pub lines_deleted: i64,
    /// Lines modified in place (>= 0)
    pub lines_modified: i64,
    /// Whether this change was AI-suggested
    pub ai_generated: bool,
}

// ============================================
// Milestones
// ============================================

/// A named point in time during a session.
///
/// Names are free-form; the reserved prefixes [`PHASE_START_PREFIX`] and
/// [`PHASE_COMPLETE_PREFIX`] carry phase-segmentation meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Row id assigned by the store
    pub id: i64,
    /// Session this milestone belongs to
    pub session_id: i64,
    /// Milestone name
    pub name: String,
    /// When the milestone was reached
    pub timestamp: DateTime<Utc>,
    /// Whole minutes since session start, computed at write time
    pub elapsed_minutes: i64,
    /// Free-form description
    pub description: Option<String>,
}

impl Milestone {
    /// Phase name if this milestone opens a phase.
    pub fn phase_started(&self) -> Option<&str> {
        self.name.strip_prefix(PHASE_START_PREFIX)
    }

    /// Phase name if this milestone closes a phase.
    pub fn phase_completed(&self) -> Option<&str> {
        self.name.strip_prefix(PHASE_COMPLETE_PREFIX)
    }
}

// ============================================
// Build results
// ============================================

/// Kind of build recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildKind {
    Compile,
    Test,
    Package,
}

impl BuildKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildKind::Compile => "compile",
            BuildKind::Test => "test",
            BuildKind::Package => "package",
        }
    }
}

impl std::str::FromStr for BuildKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compile" => Ok(BuildKind::Compile),
            "test" => Ok(BuildKind::Test),
            "package" => Ok(BuildKind::Package),
            _ => Err(format!("unknown build kind: {}", s)),
        }
    }
}

/// One compile/test/package run recorded during a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResult {
    /// Row id assigned by the store
    pub id: i64,
    /// Session this build belongs to
    pub session_id: i64,
    /// Kind of build
    pub build_kind: BuildKind,
    /// When the build ran
    pub timestamp: DateTime<Utc>,
    /// Whether the build itself succeeded
    pub success: bool,
    /// Tests passed (for test builds)
    pub tests_passed: Option<i64>,
    /// Tests failed (for test builds)
    pub tests_failed: Option<i64>,
    /// Wall-clock duration, if captured
    pub duration_seconds: Option<i64>,
}

// ============================================
// Developer feedback
// ============================================

/// Subjective assessment from the developer; at most one per session.
///
/// All ratings are 1-5 and optional. Absent ratings stay absent through
/// serialization so consumers can distinguish "no opinion recorded" from
/// "rated zero".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeveloperFeedback {
    /// Session this feedback is for
    pub session_id: i64,
    /// When the feedback was given
    pub timestamp: DateTime<Utc>,
    pub ease_of_use_rating: Option<i32>,
    pub code_quality_rating: Option<i32>,
    pub productivity_rating: Option<i32>,
    pub learning_curve_rating: Option<i32>,
    pub overall_satisfaction: Option<i32>,
    /// Would the developer recommend the tool
    pub would_recommend: Option<bool>,
    pub likes: Option<String>,
    pub dislikes: Option<String>,
    pub suggestions: Option<String>,
}
