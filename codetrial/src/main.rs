//! codetrial - record and analyze AI coding assistant evaluation sessions
//!
//! Command-line front end over the codetrial-core event store and metrics
//! engine. `session` manages the run lifecycle, `log` appends event
//! records, `report` derives metrics.

mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use codetrial_core::db::{NewBuildResult, NewCodeChange, NewInteraction};
use codetrial_core::metrics::MetricsEngine;
use codetrial_core::{
    phase_complete_name, phase_start_name, ChangeKind, Config, Database, DeveloperFeedback,
    NewSession, SessionFilter, SessionStatus,
};

#[derive(Parser)]
#[command(name = "codetrial")]
#[command(about = "Record and analyze AI coding assistant evaluation sessions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage evaluation sessions
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Append event records to a session
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },
    /// Derive metrics from recorded sessions
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Start a new session and print its id
    Start {
        /// Human-friendly name for the run
        name: String,

        /// Tool under evaluation
        #[arg(long)]
        tool: String,

        /// Scenario type (bug_fix, new_feature, refactoring, ...)
        #[arg(long)]
        scenario: String,

        /// Developer id; falls back to the configured default
        #[arg(long)]
        developer: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// End a session as completed (or failed)
    End {
        /// Session id
        session: i64,

        /// Mark the session failed instead of completed
        #[arg(long)]
        failed: bool,
    },

    /// List recorded sessions
    List {
        /// Only sessions for this tool
        #[arg(long)]
        tool: Option<String>,

        /// Only sessions with this scenario type
        #[arg(long)]
        scenario: Option<String>,

        /// Only sessions in this status (in_progress, completed, failed)
        #[arg(long)]
        status: Option<String>,

        /// Maximum number of sessions to show
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
enum LogCommand {
    /// Record one prompt/response cycle with the tool
    Interaction {
        /// Session id
        session: i64,

        /// The prompt text
        #[arg(long)]
        prompt: String,

        /// The tool's response
        #[arg(long)]
        response: Option<String>,

        /// Interaction kind (code_generation, explanation, debug, ...)
        #[arg(long)]
        kind: Option<String>,

        /// Quality rating, 1-5
        #[arg(long)]
        rating: Option<i32>,

        /// Whether the response was helpful (true/false)
        #[arg(long)]
        helpful: Option<bool>,

        /// Tokens consumed
        #[arg(long)]
        tokens: Option<i64>,

        /// Monetary cost estimate
        #[arg(long)]
        cost: Option<f64>,
    },

    /// Record a file modification
    Change {
        /// Session id
        session: i64,

        /// Path of the touched file
        #[arg(long)]
        file: String,

        /// Kind of modification (create, modify, delete, rename)
        #[arg(long, default_value = "modify")]
        kind: String,

        /// Lines added
        #[arg(long, default_value_t = 0)]
        added: i64,

        /// Lines deleted
        #[arg(long, default_value_t = 0)]
        deleted: i64,

        /// Lines modified in place
        #[arg(long, default_value_t = 0)]
        modified: i64,

        /// Flag the change as AI-suggested
        #[arg(long)]
        ai: bool,
    },

    /// Retroactively flag recent changes as AI-suggested
    MarkAi {
        /// Session id
        session: i64,

        /// Look-back window in minutes
        #[arg(long, default_value_t = 5)]
        window: i64,
    },

    /// Record a named milestone
    Milestone {
        /// Session id
        session: i64,

        /// Milestone name
        name: String,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },

    /// Record the start of a development phase
    PhaseStart {
        /// Session id
        session: i64,

        /// Phase name (design, implementation, testing, ...)
        phase: String,
    },

    /// Record the completion of a development phase
    PhaseComplete {
        /// Session id
        session: i64,

        /// Phase name
        phase: String,
    },

    /// Record a build or test run
    Build {
        /// Session id
        session: i64,

        /// Kind of build (compile, test, package)
        #[arg(long, default_value = "compile")]
        kind: String,

        /// The build failed
        #[arg(long)]
        failed: bool,

        /// Tests passed (for test builds)
        #[arg(long)]
        tests_passed: Option<i64>,

        /// Tests failed (for test builds)
        #[arg(long)]
        tests_failed: Option<i64>,

        /// Wall-clock duration in seconds
        #[arg(long)]
        duration: Option<i64>,
    },

    /// Record developer feedback (replaces earlier feedback for the session)
    Feedback {
        /// Session id
        session: i64,

        /// Ease-of-use rating, 1-5
        #[arg(long)]
        ease: Option<i32>,

        /// Code quality rating, 1-5
        #[arg(long)]
        quality: Option<i32>,

        /// Productivity rating, 1-5
        #[arg(long)]
        productivity: Option<i32>,

        /// Learning curve rating, 1-5
        #[arg(long)]
        learning: Option<i32>,

        /// Overall satisfaction, 1-5
        #[arg(long)]
        satisfaction: Option<i32>,

        /// Would recommend the tool (true/false)
        #[arg(long)]
        recommend: Option<bool>,

        /// What worked well
        #[arg(long)]
        likes: Option<String>,

        /// What did not
        #[arg(long)]
        dislikes: Option<String>,

        /// Suggested improvements
        #[arg(long)]
        suggestions: Option<String>,
    },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Aggregated metrics for one session
    Session {
        /// Session id
        session: i64,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Compare two tools over their completed sessions
    Compare {
        /// First tool (differences are from its point of view)
        tool_a: String,

        /// Second tool
        tool_b: String,

        /// Restrict to one scenario type
        #[arg(long)]
        scenario: Option<String>,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Descriptive statistics over completed sessions
    Summary {
        /// Only sessions for this tool
        #[arg(long)]
        tool: Option<String>,

        /// Only sessions with this scenario type
        #[arg(long)]
        scenario: Option<String>,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        codetrial_core::logging::init(&config.logging).context("failed to initialize logging")?;

    // Open database
    let db_path = Config::database_path();
    tracing::info!(path = %db_path.display(), "Opening database");
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    match cli.command {
        Command::Session { command } => run_session(&db, &config, command),
        Command::Log { command } => run_log(&db, command),
        Command::Report { command } => run_report(&db, &config, command),
    }
}

fn run_session(db: &Database, config: &Config, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Start {
            name,
            tool,
            scenario,
            developer,
            notes,
        } => {
            let developer_id = developer.or_else(|| config.developer.id.clone());
            let id = db
                .create_session(&NewSession {
                    name,
                    tool_name: tool,
                    scenario_type: scenario,
                    developer_id,
                    started_at: None,
                    notes,
                })
                .context("failed to create session")?;
            println!("Started session {}", id);
        }

        SessionCommand::End { session, failed } => {
            let status = if failed {
                SessionStatus::Failed
            } else {
                SessionStatus::Completed
            };
            db.complete_session(session, status, None)
                .with_context(|| format!("failed to end session {}", session))?;
            println!("Session {} {}", session, status);
        }

        SessionCommand::List {
            tool,
            scenario,
            status,
            limit,
            format,
        } => {
            let status = status
                .map(|s| s.parse::<SessionStatus>())
                .transpose()
                .map_err(|e| anyhow::anyhow!(e))?;
            let sessions = db.list_sessions(&SessionFilter {
                tool_name: tool,
                scenario_type: scenario,
                status,
                limit,
            })?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("No sessions found.");
            } else {
                report::print_session_table(&sessions);
            }
        }
    }
    Ok(())
}

fn run_log(db: &Database, command: LogCommand) -> Result<()> {
    match command {
        LogCommand::Interaction {
            session,
            prompt,
            response,
            kind,
            rating,
            helpful,
            tokens,
            cost,
        } => {
            require_session(db, session)?;
            let id = db.insert_interaction(
                session,
                &NewInteraction {
                    prompt_text: prompt,
                    response_text: response,
                    interaction_kind: kind,
                    quality_rating: rating,
                    was_helpful: helpful,
                    tokens_used: tokens,
                    cost_estimate: cost,
                    timestamp: None,
                },
            )?;
            println!("Logged interaction {}", id);
        }

        LogCommand::Change {
            session,
            file,
            kind,
            added,
            deleted,
            modified,
            ai,
        } => {
            require_session(db, session)?;
            let change_kind: ChangeKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let id = db.insert_code_change(
                session,
                &NewCodeChange {
                    file_path: file,
                    change_kind,
                    lines_added: added,
                    lines_deleted: deleted,
                    lines_modified: modified,
                    ai_generated: ai,
                    timestamp: None,
                },
            )?;
            println!("Logged change {}", id);
        }

        LogCommand::MarkAi { session, window } => {
            require_session(db, session)?;
            let updated = db.mark_recent_changes_ai(session, window)?;
            println!("Marked {} change(s) as AI-generated", updated);
        }

        LogCommand::Milestone {
            session,
            name,
            description,
        } => {
            db.insert_milestone(session, &name, description.as_deref(), None)?;
            println!("Logged milestone '{}'", name);
        }

        LogCommand::PhaseStart { session, phase } => {
            db.insert_milestone(session, &phase_start_name(&phase), None, None)?;
            println!("Phase '{}' started", phase);
        }

        LogCommand::PhaseComplete { session, phase } => {
            db.insert_milestone(session, &phase_complete_name(&phase), None, None)?;
            println!("Phase '{}' completed", phase);
        }

        LogCommand::Build {
            session,
            kind,
            failed,
            tests_passed,
            tests_failed,
            duration,
        } => {
            require_session(db, session)?;
            let build_kind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let id = db.insert_build_result(
                session,
                &NewBuildResult {
                    build_kind,
                    success: !failed,
                    tests_passed,
                    tests_failed,
                    duration_seconds: duration,
                    timestamp: None,
                },
            )?;
            println!("Logged build {}", id);
        }

        LogCommand::Feedback {
            session,
            ease,
            quality,
            productivity,
            learning,
            satisfaction,
            recommend,
            likes,
            dislikes,
            suggestions,
        } => {
            require_session(db, session)?;
            for rating in [ease, quality, productivity, learning, satisfaction]
                .into_iter()
                .flatten()
            {
                if !(1..=5).contains(&rating) {
                    bail!("ratings must be between 1 and 5, got {}", rating);
                }
            }
            db.upsert_feedback(&DeveloperFeedback {
                session_id: session,
                timestamp: chrono::Utc::now(),
                ease_of_use_rating: ease,
                code_quality_rating: quality,
                productivity_rating: productivity,
                learning_curve_rating: learning,
                overall_satisfaction: satisfaction,
                would_recommend: recommend,
                likes,
                dislikes,
                suggestions,
            })?;
            println!("Feedback recorded for session {}", session);
        }
    }
    Ok(())
}

fn run_report(db: &Database, config: &Config, command: ReportCommand) -> Result<()> {
    let engine = MetricsEngine::new(db, config.comparison.clone());

    match command {
        ReportCommand::Session { session, format } => {
            let metrics = engine
                .session_metrics(session)
                .with_context(|| format!("failed to compute metrics for session {}", session))?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                report::print_session_metrics(&metrics);
            }
        }

        ReportCommand::Compare {
            tool_a,
            tool_b,
            scenario,
            format,
        } => {
            let comparison = engine.compare_tools(&tool_a, &tool_b, scenario.as_deref())?;
            let Some(comparison) = comparison else {
                bail!(
                    "comparison needs at least one completed session for both '{}' and '{}'",
                    tool_a,
                    tool_b
                );
            };
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                report::print_comparison(&comparison);
            }
        }

        ReportCommand::Summary {
            tool,
            scenario,
            format,
        } => {
            let stats = engine.summary_stats(tool.as_deref(), scenario.as_deref())?;
            let Some(stats) = stats else {
                println!("No completed sessions match.");
                return Ok(());
            };
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                report::print_summary(&stats);
            }
        }
    }
    Ok(())
}

/// Fail fast with a clear message instead of a foreign-key error.
fn require_session(db: &Database, session_id: i64) -> Result<()> {
    if db.get_session(session_id)?.is_none() {
        bail!("no session with id {}", session_id);
    }
    Ok(())
}
