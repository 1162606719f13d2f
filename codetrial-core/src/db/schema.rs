//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT NOT NULL,
        tool_name        TEXT NOT NULL,
        scenario_type    TEXT NOT NULL,
        developer_id     TEXT,
        started_at       DATETIME NOT NULL,
        ended_at         DATETIME,
        status           TEXT NOT NULL DEFAULT 'in_progress',
        notes            TEXT
    );

    CREATE TABLE IF NOT EXISTS ai_interactions (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id       INTEGER NOT NULL REFERENCES sessions(id),
        sequence         INTEGER NOT NULL,
        timestamp        DATETIME NOT NULL,
        prompt_text      TEXT NOT NULL,
        response_text    TEXT,
        interaction_kind TEXT,
        quality_rating   INTEGER CHECK (quality_rating BETWEEN 1 AND 5),
        was_helpful      INTEGER,
        tokens_used      INTEGER,
        cost_estimate    REAL,

        UNIQUE(session_id, sequence)
    );

    CREATE TABLE IF NOT EXISTS code_changes (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id       INTEGER NOT NULL REFERENCES sessions(id),
        file_path        TEXT NOT NULL,
        change_kind      TEXT NOT NULL,
        timestamp        DATETIME NOT NULL,
        lines_added      INTEGER NOT NULL DEFAULT 0 CHECK (lines_added >= 0),
        lines_deleted    INTEGER NOT NULL DEFAULT 0 CHECK (lines_deleted >= 0),
        lines_modified   INTEGER NOT NULL DEFAULT 0 CHECK (lines_modified >= 0),
        ai_generated     INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS milestones (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id       INTEGER NOT NULL REFERENCES sessions(id),
        name             TEXT NOT NULL,
        timestamp        DATETIME NOT NULL,
        elapsed_minutes  INTEGER NOT NULL,
        description      TEXT
    );

    CREATE TABLE IF NOT EXISTS build_results (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id       INTEGER NOT NULL REFERENCES sessions(id),
        build_kind       TEXT NOT NULL,
        timestamp        DATETIME NOT NULL,
        success          INTEGER NOT NULL,
        tests_passed     INTEGER,
        tests_failed     INTEGER,
        duration_seconds INTEGER
    );

    CREATE TABLE IF NOT EXISTS developer_feedback (
        session_id            INTEGER PRIMARY KEY REFERENCES sessions(id),
        timestamp             DATETIME NOT NULL,
        ease_of_use_rating    INTEGER CHECK (ease_of_use_rating BETWEEN 1 AND 5),
        code_quality_rating   INTEGER CHECK (code_quality_rating BETWEEN 1 AND 5),
        productivity_rating   INTEGER CHECK (productivity_rating BETWEEN 1 AND 5),
        learning_curve_rating INTEGER CHECK (learning_curve_rating BETWEEN 1 AND 5),
        overall_satisfaction  INTEGER CHECK (overall_satisfaction BETWEEN 1 AND 5),
        would_recommend       INTEGER,
        likes                 TEXT,
        dislikes              TEXT,
        suggestions           TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_tool_scenario
        ON sessions(tool_name, scenario_type);
    CREATE INDEX IF NOT EXISTS idx_sessions_status
        ON sessions(status);
    CREATE INDEX IF NOT EXISTS idx_ai_interactions_session
        ON ai_interactions(session_id, timestamp);
    CREATE INDEX IF NOT EXISTS idx_code_changes_session
        ON code_changes(session_id, timestamp);
    CREATE INDEX IF NOT EXISTS idx_milestones_session
        ON milestones(session_id, timestamp);
    CREATE INDEX IF NOT EXISTS idx_build_results_session
        ON build_results(session_id, timestamp);
    "#,
];

/// Run any pending migrations on the connection.
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current >= SCHEMA_VERSION {
        tracing::debug!(version = current, "Schema up to date");
        return Ok(());
    }

    for (idx, migration) in MIGRATIONS.iter().enumerate() {
        let version = idx as i32 + 1;
        if version <= current {
            continue;
        }

        tracing::info!(version, "Applying schema migration");
        conn.execute_batch(migration)?;
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_apply_cleanly() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        // Running again is a no-op
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        for table in [
            "sessions",
            "ai_interactions",
            "code_changes",
            "milestones",
            "build_results",
            "developer_feedback",
        ] {
            assert!(tables.iter().any(|t| t == table), "missing table {}", table);
        }
    }
}
