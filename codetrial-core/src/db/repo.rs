//! Database repository layer
//!
//! Provides query and insert operations for sessions and their child event
//! records. Writes are single-statement and atomic; the design assumes one
//! active logging process per session, so no coordination beyond the
//! store's own locking is needed.

use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;

/// Filter for listing sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Only sessions for this tool
    pub tool_name: Option<String>,
    /// Only sessions with this scenario type
    pub scenario_type: Option<String>,
    /// Only sessions in this status
    pub status: Option<SessionStatus>,
    /// Maximum number of sessions to return
    pub limit: Option<usize>,
}

impl SessionFilter {
    /// Filter for completed sessions of a tool, the unit of comparison.
    pub fn completed_for_tool(tool_name: &str, scenario_type: Option<&str>) -> Self {
        Self {
            tool_name: Some(tool_name.to_string()),
            scenario_type: scenario_type.map(String::from),
            status: Some(SessionStatus::Completed),
            limit: None,
        }
    }
}

/// Fields for appending an AI interaction; the store assigns the sequence.
#[derive(Debug, Clone, Default)]
pub struct NewInteraction {
    pub prompt_text: String,
    pub response_text: Option<String>,
    pub interaction_kind: Option<String>,
    pub quality_rating: Option<i32>,
    pub was_helpful: Option<bool>,
    pub tokens_used: Option<i64>,
    pub cost_estimate: Option<f64>,
    /// Event time; None means "now"
    pub timestamp: Option<DateTime<Utc>>,
}

/// Fields for appending a code change.
#[derive(Debug, Clone)]
pub struct NewCodeChange {
    pub file_path: String,
    pub change_kind: ChangeKind,
    pub lines_added: i64,
    pub lines_deleted: i64,
    pub lines_modified: i64,
    pub ai_generated: bool,
    /// Event time; None means "now"
    pub timestamp: Option<DateTime<Utc>>,
}

/// Fields for appending a build result.
#[derive(Debug, Clone)]
pub struct NewBuildResult {
    pub build_kind: BuildKind,
    pub success: bool,
    pub tests_passed: Option<i64>,
    pub tests_failed: Option<i64>,
    pub duration_seconds: Option<i64>,
    /// Event time; None means "now"
    pub timestamp: Option<DateTime<Utc>>,
}

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Session operations
    // ============================================

    /// Create a new session and return its id.
    pub fn create_session(&self, new: &NewSession) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let started_at = new.started_at.unwrap_or_else(Utc::now);

        conn.execute(
            r#"
            INSERT INTO sessions (name, tool_name, scenario_type, developer_id,
                                  started_at, status, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                new.name,
                new.tool_name,
                new.scenario_type,
                new.developer_id,
                started_at.to_rfc3339(),
                SessionStatus::InProgress.as_str(),
                new.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(session_id = id, tool = %new.tool_name, "Session created");
        Ok(id)
    }

    /// Transition a session to completed or failed, setting its end time.
    ///
    /// `ended_at = None` means "now". Returns `SessionNotFound` if the id
    /// does not exist.
    pub fn complete_session(
        &self,
        id: i64,
        status: SessionStatus,
        ended_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let ended_at = ended_at.unwrap_or_else(Utc::now);

        let updated = conn.execute(
            "UPDATE sessions SET status = ?1, ended_at = ?2 WHERE id = ?3",
            params![status.as_str(), ended_at.to_rfc3339(), id],
        )?;

        if updated == 0 {
            return Err(Error::SessionNotFound(id));
        }

        tracing::info!(session_id = id, status = %status, "Session ended");
        Ok(())
    }

    /// Get a session by id
    pub fn get_session(&self, id: i64) -> Result<Option<Session>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM sessions WHERE id = ?", [id], |row| {
            Self::row_to_session(row)
        })
        .optional()
        .map_err(Error::from)
    }

    /// List sessions with optional filtering
    pub fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = String::from("SELECT * FROM sessions WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![];

        if let Some(tool_name) = &filter.tool_name {
            sql.push_str(" AND tool_name = ?");
            params.push(Box::new(tool_name.clone()));
        }

        if let Some(scenario_type) = &filter.scenario_type {
            sql.push_str(" AND scenario_type = ?");
            params.push(Box::new(scenario_type.clone()));
        }

        if let Some(status) = &filter.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str().to_string()));
        }

        sql.push_str(" ORDER BY started_at ASC");

        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let sessions = stmt
            .query_map(params_refs.as_slice(), Self::row_to_session)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    fn row_to_session(row: &Row) -> rusqlite::Result<Session> {
        let status_str: String = row.get("status")?;
        let started_at_str: String = row.get("started_at")?;
        let ended_at_str: Option<String> = row.get("ended_at")?;

        Ok(Session {
            id: row.get("id")?,
            name: row.get("name")?,
            tool_name: row.get("tool_name")?,
            scenario_type: row.get("scenario_type")?,
            developer_id: row.get("developer_id")?,
            started_at: parse_ts(&started_at_str),
            ended_at: ended_at_str.as_deref().map(parse_ts),
            status: status_str.parse().unwrap_or(SessionStatus::InProgress),
            notes: row.get("notes")?,
        })
    }

    // ============================================
    // AI interaction operations
    // ============================================

    /// Append an AI interaction, assigning the next sequence number.
    ///
    /// Sequences are strictly increasing per session and never reused; the
    /// UNIQUE(session_id, sequence) constraint rejects duplicates.
    pub fn insert_interaction(&self, session_id: i64, new: &NewInteraction) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let timestamp = new.timestamp.unwrap_or_else(Utc::now);

        let last: Option<i64> = conn.query_row(
            "SELECT MAX(sequence) FROM ai_interactions WHERE session_id = ?",
            [session_id],
            |row| row.get(0),
        )?;
        let sequence = last.unwrap_or(0) + 1;

        conn.execute(
            r#"
            INSERT INTO ai_interactions (session_id, sequence, timestamp, prompt_text,
                                         response_text, interaction_kind, quality_rating,
                                         was_helpful, tokens_used, cost_estimate)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                session_id,
                sequence,
                timestamp.to_rfc3339(),
                new.prompt_text,
                new.response_text,
                new.interaction_kind,
                new.quality_rating,
                new.was_helpful,
                new.tokens_used,
                new.cost_estimate,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get AI interactions for a session, ordered by timestamp
    pub fn interactions_for_session(&self, session_id: i64) -> Result<Vec<AiInteraction>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM ai_interactions WHERE session_id = ? ORDER BY timestamp ASC, sequence ASC",
        )?;

        let interactions = stmt
            .query_map([session_id], Self::row_to_interaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(interactions)
    }

    fn row_to_interaction(row: &Row) -> rusqlite::Result<AiInteraction> {
        let timestamp_str: String = row.get("timestamp")?;

        Ok(AiInteraction {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            sequence: row.get("sequence")?,
            timestamp: parse_ts(&timestamp_str),
            prompt_text: row.get("prompt_text")?,
            response_text: row.get("response_text")?,
            interaction_kind: row.get("interaction_kind")?,
            quality_rating: row.get("quality_rating")?,
            was_helpful: row.get("was_helpful")?,
            tokens_used: row.get("tokens_used")?,
            cost_estimate: row.get("cost_estimate")?,
        })
    }

    // ============================================
    // Code change operations
    // ============================================

    /// Append a code change
    pub fn insert_code_change(&self, session_id: i64, new: &NewCodeChange) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let timestamp = new.timestamp.unwrap_or_else(Utc::now);

        conn.execute(
            r#"
            INSERT INTO code_changes (session_id, file_path, change_kind, timestamp,
                                      lines_added, lines_deleted, lines_modified, ai_generated)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                session_id,
                new.file_path,
                new.change_kind.as_str(),
                timestamp.to_rfc3339(),
                new.lines_added,
                new.lines_deleted,
                new.lines_modified,
                new.ai_generated,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Retroactively flag recent changes as AI-generated.
    ///
    /// Marks changes within the last `window_minutes` that are not already
    /// flagged. Returns the number of changes updated.
    pub fn mark_recent_changes_ai(&self, session_id: i64, window_minutes: i64) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let cutoff = Utc::now() - Duration::minutes(window_minutes);

        let updated = conn.execute(
            r#"
            UPDATE code_changes
            SET ai_generated = 1
            WHERE session_id = ?1 AND timestamp >= ?2 AND ai_generated = 0
            "#,
            params![session_id, cutoff.to_rfc3339()],
        )?;

        tracing::debug!(session_id, updated, "Marked recent changes as AI-generated");
        Ok(updated)
    }

    /// Get code changes for a session, ordered by timestamp
    pub fn changes_for_session(&self, session_id: i64) -> Result<Vec<CodeChange>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM code_changes WHERE session_id = ? ORDER BY timestamp ASC")?;

        let changes = stmt
            .query_map([session_id], Self::row_to_change)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(changes)
    }

    fn row_to_change(row: &Row) -> rusqlite::Result<CodeChange> {
        let kind_str: String = row.get("change_kind")?;
        let timestamp_str: String = row.get("timestamp")?;

        Ok(CodeChange {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            file_path: row.get("file_path")?,
            change_kind: kind_str.parse().unwrap_or(ChangeKind::Modify),
            timestamp: parse_ts(&timestamp_str),
            lines_added: row.get("lines_added")?,
            lines_deleted: row.get("lines_deleted")?,
            lines_modified: row.get("lines_modified")?,
            ai_generated: row.get("ai_generated")?,
        })
    }

    // ============================================
    // Milestone operations
    // ============================================

    /// Append a milestone, computing elapsed minutes from the session start.
    ///
    /// `timestamp = None` means "now". Returns `SessionNotFound` if the
    /// session does not exist.
    pub fn insert_milestone(
        &self,
        session_id: i64,
        name: &str,
        description: Option<&str>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();

        let started_at_str: Option<String> = conn
            .query_row(
                "SELECT started_at FROM sessions WHERE id = ?",
                [session_id],
                |row| row.get(0),
            )
            .optional()?;
        let started_at = match started_at_str {
            Some(s) => parse_ts(&s),
            None => return Err(Error::SessionNotFound(session_id)),
        };

        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let elapsed_minutes = timestamp
            .signed_duration_since(started_at)
            .num_minutes()
            .max(0);

        conn.execute(
            r#"
            INSERT INTO milestones (session_id, name, timestamp, elapsed_minutes, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                session_id,
                name,
                timestamp.to_rfc3339(),
                elapsed_minutes,
                description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get milestones for a session, ordered by timestamp
    pub fn milestones_for_session(&self, session_id: i64) -> Result<Vec<Milestone>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM milestones WHERE session_id = ? ORDER BY timestamp ASC")?;

        let milestones = stmt
            .query_map([session_id], Self::row_to_milestone)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(milestones)
    }

    fn row_to_milestone(row: &Row) -> rusqlite::Result<Milestone> {
        let timestamp_str: String = row.get("timestamp")?;

        Ok(Milestone {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            name: row.get("name")?,
            timestamp: parse_ts(&timestamp_str),
            elapsed_minutes: row.get("elapsed_minutes")?,
            description: row.get("description")?,
        })
    }

    // ============================================
    // Build result operations
    // ============================================

    /// Append a build result
    pub fn insert_build_result(&self, session_id: i64, new: &NewBuildResult) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let timestamp = new.timestamp.unwrap_or_else(Utc::now);

        conn.execute(
            r#"
            INSERT INTO build_results (session_id, build_kind, timestamp, success,
                                       tests_passed, tests_failed, duration_seconds)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                session_id,
                new.build_kind.as_str(),
                timestamp.to_rfc3339(),
                new.success,
                new.tests_passed,
                new.tests_failed,
                new.duration_seconds,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get build results for a session, ordered by timestamp
    pub fn builds_for_session(&self, session_id: i64) -> Result<Vec<BuildResult>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT * FROM build_results WHERE session_id = ? ORDER BY timestamp ASC")?;

        let builds = stmt
            .query_map([session_id], Self::row_to_build)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(builds)
    }

    fn row_to_build(row: &Row) -> rusqlite::Result<BuildResult> {
        let kind_str: String = row.get("build_kind")?;
        let timestamp_str: String = row.get("timestamp")?;

        Ok(BuildResult {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            build_kind: kind_str.parse().unwrap_or(BuildKind::Compile),
            timestamp: parse_ts(&timestamp_str),
            success: row.get("success")?,
            tests_passed: row.get("tests_passed")?,
            tests_failed: row.get("tests_failed")?,
            duration_seconds: row.get("duration_seconds")?,
        })
    }

    // ============================================
    // Feedback operations
    // ============================================

    /// Insert or replace the feedback record for a session (at most one).
    pub fn upsert_feedback(&self, feedback: &DeveloperFeedback) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO developer_feedback (session_id, timestamp, ease_of_use_rating,
                                            code_quality_rating, productivity_rating,
                                            learning_curve_rating, overall_satisfaction,
                                            would_recommend, likes, dislikes, suggestions)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(session_id) DO UPDATE SET
                timestamp = excluded.timestamp,
                ease_of_use_rating = excluded.ease_of_use_rating,
                code_quality_rating = excluded.code_quality_rating,
                productivity_rating = excluded.productivity_rating,
                learning_curve_rating = excluded.learning_curve_rating,
                overall_satisfaction = excluded.overall_satisfaction,
                would_recommend = excluded.would_recommend,
                likes = excluded.likes,
                dislikes = excluded.dislikes,
                suggestions = excluded.suggestions
            "#,
            params![
                feedback.session_id,
                feedback.timestamp.to_rfc3339(),
                feedback.ease_of_use_rating,
                feedback.code_quality_rating,
                feedback.productivity_rating,
                feedback.learning_curve_rating,
                feedback.overall_satisfaction,
                feedback.would_recommend,
                feedback.likes,
                feedback.dislikes,
                feedback.suggestions,
            ],
        )?;
        Ok(())
    }

    /// Get the feedback record for a session, if any
    pub fn feedback_for_session(&self, session_id: i64) -> Result<Option<DeveloperFeedback>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM developer_feedback WHERE session_id = ?",
            [session_id],
            Self::row_to_feedback,
        )
        .optional()
        .map_err(Error::from)
    }

    fn row_to_feedback(row: &Row) -> rusqlite::Result<DeveloperFeedback> {
        let timestamp_str: String = row.get("timestamp")?;

        Ok(DeveloperFeedback {
            session_id: row.get("session_id")?,
            timestamp: parse_ts(&timestamp_str),
            ease_of_use_rating: row.get("ease_of_use_rating")?,
            code_quality_rating: row.get("code_quality_rating")?,
            productivity_rating: row.get("productivity_rating")?,
            learning_curve_rating: row.get("learning_curve_rating")?,
            overall_satisfaction: row.get("overall_satisfaction")?,
            would_recommend: row.get("would_recommend")?,
            likes: row.get("likes")?,
            dislikes: row.get("dislikes")?,
            suggestions: row.get("suggestions")?,
        })
    }
}

/// Parse an RFC 3339 timestamp, falling back to "now" for malformed rows.
fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_db() -> Database {
        let db = Database::open_in_memory().expect("open in-memory db");
        db.migrate().expect("migrate schema");
        db
    }

    fn new_session(tool: &str) -> NewSession {
        NewSession {
            name: format!("{}-run", tool),
            tool_name: tool.to_string(),
            scenario_type: "bug_fix".to_string(),
            developer_id: Some("dev-1".to_string()),
            started_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let db = test_db();
        let id = db.create_session(&new_session("cursor")).unwrap();

        let session = db.get_session(id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::InProgress);
        assert!(session.ended_at.is_none());

        db.complete_session(id, SessionStatus::Completed, None)
            .unwrap();
        let session = db.get_session(id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.ended_at.is_some());

        assert!(db.get_session(999).unwrap().is_none());
        assert!(matches!(
            db.complete_session(999, SessionStatus::Completed, None),
            Err(Error::SessionNotFound(999))
        ));
    }

    #[test]
    fn test_list_sessions_filters() {
        let db = test_db();
        let a = db.create_session(&new_session("cursor")).unwrap();
        let _b = db.create_session(&new_session("copilot")).unwrap();
        db.complete_session(a, SessionStatus::Completed, None)
            .unwrap();

        let all = db.list_sessions(&SessionFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let completed = db
            .list_sessions(&SessionFilter::completed_for_tool("cursor", None))
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, a);

        let other_scenario = db
            .list_sessions(&SessionFilter::completed_for_tool(
                "cursor",
                Some("new_feature"),
            ))
            .unwrap();
        assert!(other_scenario.is_empty());
    }

    #[test]
    fn test_interaction_sequence_assignment() {
        let db = test_db();
        let id = db.create_session(&new_session("cursor")).unwrap();

        for _ in 0..3 {
            db.insert_interaction(
                id,
                &NewInteraction {
                    prompt_text: "write a test".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let interactions = db.interactions_for_session(id).unwrap();
        let sequences: Vec<i64> = interactions.iter().map(|i| i.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_mark_recent_changes_ai() {
        let db = test_db();
        let id = db.create_session(&new_session("cursor")).unwrap();

        let old = Utc::now() - Duration::minutes(60);
        db.insert_code_change(
            id,
            &NewCodeChange {
                file_path: "src/old.rs".to_string(),
                change_kind: ChangeKind::Modify,
                lines_added: 1,
                lines_deleted: 0,
                lines_modified: 0,
                ai_generated: false,
                timestamp: Some(old),
            },
        )
        .unwrap();
        db.insert_code_change(
            id,
            &NewCodeChange {
                file_path: "src/new.rs".to_string(),
                change_kind: ChangeKind::Create,
                lines_added: 10,
                lines_deleted: 0,
                lines_modified: 0,
                ai_generated: false,
                timestamp: None,
            },
        )
        .unwrap();

        let updated = db.mark_recent_changes_ai(id, 5).unwrap();
        assert_eq!(updated, 1);

        let changes = db.changes_for_session(id).unwrap();
        assert!(!changes[0].ai_generated);
        assert!(changes[1].ai_generated);
    }

    #[test]
    fn test_milestone_elapsed_minutes() {
        let db = test_db();
        let start = Utc::now() - Duration::minutes(45);
        let mut new = new_session("cursor");
        new.started_at = Some(start);
        let id = db.create_session(&new).unwrap();

        db.insert_milestone(
            id,
            "initial_implementation",
            Some("first pass done"),
            Some(start + Duration::minutes(20)),
        )
        .unwrap();

        let milestones = db.milestones_for_session(id).unwrap();
        assert_eq!(milestones.len(), 1);
        assert_eq!(milestones[0].elapsed_minutes, 20);

        assert!(matches!(
            db.insert_milestone(999, "x", None, None),
            Err(Error::SessionNotFound(999))
        ));
    }

    #[test]
    fn test_feedback_upsert_replaces() {
        let db = test_db();
        let id = db.create_session(&new_session("cursor")).unwrap();

        let mut feedback = DeveloperFeedback {
            session_id: id,
            timestamp: Utc::now(),
            ease_of_use_rating: Some(4),
            code_quality_rating: None,
            productivity_rating: None,
            learning_curve_rating: None,
            overall_satisfaction: Some(3),
            would_recommend: Some(true),
            likes: None,
            dislikes: None,
            suggestions: None,
        };
        db.upsert_feedback(&feedback).unwrap();

        feedback.overall_satisfaction = Some(5);
        db.upsert_feedback(&feedback).unwrap();

        let stored = db.feedback_for_session(id).unwrap().unwrap();
        assert_eq!(stored.overall_satisfaction, Some(5));
        assert_eq!(stored.code_quality_rating, None);
    }
}
