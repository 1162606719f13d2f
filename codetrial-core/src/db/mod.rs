//! Database layer for codetrial
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//! - Append-style event tables keyed by session id

pub mod repo;
pub mod schema;

pub use repo::{Database, NewBuildResult, NewCodeChange, NewInteraction, SessionFilter};
