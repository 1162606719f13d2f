//! # codetrial-core
//!
//! Core library for codetrial - a recorder and analyzer for AI coding
//! assistant evaluation sessions.
//!
//! This library provides:
//! - Domain types for sessions and their event records
//! - Database storage layer with SQLite
//! - A metrics engine deriving per-session, comparative, and summary views
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through two layers:
//! - **Event store:** append-style SQLite tables, one row per recorded
//!   event (interaction, code change, milestone, build, feedback)
//! - **Derived metrics:** recomputed on demand from the stored events,
//!   never persisted
//!
//! ## Example
//!
//! ```rust,no_run
//! use codetrial_core::{Config, Database, MetricsEngine};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! // Derive metrics
//! let engine = MetricsEngine::new(&db, config.comparison);
//! let metrics = engine.session_metrics(1).expect("failed to compute metrics");
//! println!("{} interactions", metrics.total_ai_interactions);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, SessionFilter};
pub use error::{Error, Result};
pub use metrics::{ComparisonMetrics, MetricsEngine, SessionMetrics, SummaryStats};
pub use types::*;

// Public modules
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod types;
