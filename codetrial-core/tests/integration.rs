//! End-to-end test: record a full evaluation session through the store,
//! then derive every metric view from it.

use chrono::{DateTime, Duration, Utc};
use codetrial_core::config::ComparisonConfig;
use codetrial_core::db::{NewBuildResult, NewCodeChange, NewInteraction};
use codetrial_core::metrics::{MetricsEngine, PreferenceWinner};
use codetrial_core::{
    phase_complete_name, phase_start_name, BuildKind, ChangeKind, Database, DeveloperFeedback,
    NewSession, SessionStatus,
};

fn open_db() -> Database {
    let db = Database::open_in_memory().expect("open in-memory db");
    db.migrate().expect("migrate");
    db
}

/// Record one complete 30-minute session for a tool: a design and an
/// implementation phase, rated interactions, code changes, builds, and
/// feedback.
fn record_full_session(db: &Database, tool: &str, satisfaction: i32) -> i64 {
    let start = Utc::now() - Duration::hours(3);
    let at = |minutes: i64| -> Option<DateTime<Utc>> { Some(start + Duration::minutes(minutes)) };

    let id = db
        .create_session(&NewSession {
            name: format!("{}-bugfix", tool),
            tool_name: tool.to_string(),
            scenario_type: "bug_fix".to_string(),
            developer_id: Some("dev-1".to_string()),
            started_at: Some(start),
            notes: None,
        })
        .unwrap();

    // Design phase: minutes 0-10, one interaction
    db.insert_milestone(id, &phase_start_name("design"), None, at(0))
        .unwrap();
    db.insert_interaction(
        id,
        &NewInteraction {
            prompt_text: "where does the crash come from?".to_string(),
            interaction_kind: Some("explanation".to_string()),
            quality_rating: Some(4),
            was_helpful: Some(true),
            tokens_used: Some(900),
            cost_estimate: Some(0.01),
            timestamp: at(4),
            ..Default::default()
        },
    )
    .unwrap();
    db.insert_milestone(id, &phase_complete_name("design"), None, at(10))
        .unwrap();

    // Implementation phase: minutes 10-28, two interactions, two changes
    db.insert_milestone(id, &phase_start_name("implementation"), None, at(10))
        .unwrap();
    for (minute, rating) in [(14, 5), (20, 4)] {
        db.insert_interaction(
            id,
            &NewInteraction {
                prompt_text: "write the fix".to_string(),
                interaction_kind: Some("code_generation".to_string()),
                quality_rating: Some(rating),
                was_helpful: Some(true),
                tokens_used: Some(1200),
                cost_estimate: Some(0.02),
                timestamp: Some(start + Duration::minutes(minute)),
                ..Default::default()
            },
        )
        .unwrap();
    }
    for (file, added) in [("src/parser.rs", 10), ("tests/parser.rs", 20)] {
        db.insert_code_change(
            id,
            &NewCodeChange {
                file_path: file.to_string(),
                change_kind: ChangeKind::Modify,
                lines_added: added,
                lines_deleted: 2,
                lines_modified: 1,
                ai_generated: true,
                timestamp: at(22),
            },
        )
        .unwrap();
    }
    db.insert_milestone(id, &phase_complete_name("implementation"), None, at(28))
        .unwrap();

    // Builds at the end: clean compile, one failing test out of four
    db.insert_build_result(
        id,
        &NewBuildResult {
            build_kind: BuildKind::Compile,
            success: true,
            tests_passed: None,
            tests_failed: None,
            duration_seconds: Some(3),
            timestamp: at(29),
        },
    )
    .unwrap();
    db.insert_build_result(
        id,
        &NewBuildResult {
            build_kind: BuildKind::Test,
            success: true,
            tests_passed: Some(3),
            tests_failed: Some(1),
            duration_seconds: Some(8),
            timestamp: at(29),
        },
    )
    .unwrap();

    db.upsert_feedback(&DeveloperFeedback {
        session_id: id,
        timestamp: start + Duration::minutes(30),
        ease_of_use_rating: Some(4),
        code_quality_rating: Some(4),
        productivity_rating: Some(satisfaction),
        learning_curve_rating: Some(3),
        overall_satisfaction: Some(satisfaction),
        would_recommend: Some(satisfaction >= 4),
        likes: Some("fast suggestions".to_string()),
        dislikes: None,
        suggestions: None,
    })
    .unwrap();

    db.complete_session(id, SessionStatus::Completed, at(30))
        .unwrap();
    id
}

#[test]
fn test_full_session_metrics() {
    let db = open_db();
    let id = record_full_session(&db, "cursor", 5);
    let engine = MetricsEngine::new(&db, ComparisonConfig::default());

    let metrics = engine.session_metrics(id).unwrap();

    assert_eq!(metrics.tool_name, "cursor");
    assert_eq!(metrics.status, SessionStatus::Completed);
    assert!((metrics.total_duration_minutes - 30.0).abs() < 1e-9);

    // Ratings 4, 5, 4 over three rated interactions
    assert_eq!(metrics.total_ai_interactions, 3);
    assert!((metrics.average_quality_rating - 13.0 / 3.0).abs() < 1e-9);
    assert_eq!(metrics.helpful_interactions_percentage, 100.0);
    assert_eq!(metrics.total_tokens_used, 3300);
    assert!((metrics.total_cost_estimate - 0.05).abs() < 1e-9);

    // 30 lines added over 30 minutes, two distinct files
    assert_eq!(metrics.lines_added, 30);
    assert!((metrics.lines_per_minute - 1.0).abs() < 1e-9);
    assert_eq!(metrics.unique_files, 2);
    assert!((metrics.files_per_hour - 4.0).abs() < 1e-9);
    assert_eq!(metrics.ai_generated_changes, 2);
    // 3 interactions out of 5 recorded actions
    assert!((metrics.ai_assistance_ratio - 0.6).abs() < 1e-9);

    // Both builds green, 3 of 4 tests passed
    assert_eq!(metrics.build_success_rate, 100.0);
    assert_eq!(metrics.test_pass_rate, 75.0);
    assert_eq!(metrics.code_quality_score, 87.5);

    // Both phases resolved
    assert_eq!(metrics.total_phases, 2);
    assert_eq!(metrics.phase_durations.get("design"), Some(&10.0));
    assert_eq!(metrics.phase_durations.get("implementation"), Some(&18.0));
    assert_eq!(metrics.phase_ai_usage.get("implementation"), Some(&2));
    assert!(metrics.open_phases.is_empty());

    assert_eq!(metrics.satisfaction_rating, Some(5));
    assert_eq!(metrics.would_recommend, Some(true));
}

#[test]
fn test_metrics_round_trip_through_json() {
    let db = open_db();
    let id = record_full_session(&db, "cursor", 4);
    let engine = MetricsEngine::new(&db, ComparisonConfig::default());

    let metrics = engine.session_metrics(id).unwrap();
    let json = serde_json::to_string(&metrics).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["total_ai_interactions"], 3);
    assert_eq!(parsed["satisfaction_rating"], 4);
    // Absent stays absent, not zero
    let empty_id = db
        .create_session(&NewSession {
            name: "control".to_string(),
            tool_name: "none".to_string(),
            scenario_type: "bug_fix".to_string(),
            developer_id: None,
            started_at: None,
            notes: None,
        })
        .unwrap();
    let empty = engine.session_metrics(empty_id).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&empty).unwrap()).unwrap();
    assert!(parsed["satisfaction_rating"].is_null());
    assert_eq!(parsed["average_quality_rating"], 0.0);
}

#[test]
fn test_comparison_and_summary_over_recorded_sessions() {
    let db = open_db();
    record_full_session(&db, "cursor", 5);
    record_full_session(&db, "cursor", 4);
    record_full_session(&db, "copilot", 3);

    let engine = MetricsEngine::new(&db, ComparisonConfig::default());

    let cmp = engine
        .compare_tools("cursor", "copilot", Some("bug_fix"))
        .unwrap()
        .expect("both cohorts populated");
    assert_eq!(cmp.sample_size_a, 2);
    assert_eq!(cmp.sample_size_b, 1);
    // Identical timings and output; only satisfaction differs
    assert!(cmp.speed_improvement_percentage.abs() < 1e-9);
    assert!(cmp.quality_difference_percentage.abs() < 1e-9);
    assert_eq!(cmp.satisfaction_a, Some(4.5));
    assert_eq!(cmp.satisfaction_b, Some(3.0));
    assert_eq!(cmp.preference_winner, PreferenceWinner::ToolA);

    // Unknown scenario leaves both cohorts empty
    assert!(engine
        .compare_tools("cursor", "copilot", Some("new_feature"))
        .unwrap()
        .is_none());

    let stats = engine
        .summary_stats(Some("cursor"), None)
        .unwrap()
        .expect("cursor has completed sessions");
    assert_eq!(stats.total_sessions, 2);
    assert!((stats.duration.mean - 30.0).abs() < 1e-9);
    assert!(stats.duration.std_dev.abs() < 1e-9);
    assert_eq!(stats.interactions.median, 3.0);
    let satisfaction = stats.satisfaction.expect("feedback recorded");
    assert_eq!(satisfaction.mean, 4.5);
    assert_eq!(satisfaction.count, 2);

    // Single-session cohort: spread collapses to zero, mean == median
    let copilot = engine
        .summary_stats(Some("copilot"), None)
        .unwrap()
        .unwrap();
    assert_eq!(copilot.total_sessions, 1);
    assert_eq!(copilot.duration.std_dev, 0.0);
    assert_eq!(copilot.duration.mean, copilot.duration.median);

    assert!(engine
        .summary_stats(Some("windsurf"), None)
        .unwrap()
        .is_none());
}

#[test]
fn test_on_disk_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");

    let id = {
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        record_full_session(&db, "cursor", 4)
    };

    let db = Database::open(&path).unwrap();
    db.migrate().unwrap();
    let session = db.get_session(id).unwrap().expect("session persisted");
    assert_eq!(session.tool_name, "cursor");
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(db.interactions_for_session(id).unwrap().len(), 3);
}

#[test]
fn test_in_progress_sessions_stay_out_of_cohorts() {
    let db = open_db();
    record_full_session(&db, "cursor", 4);

    // A second cursor session that never finishes
    db.create_session(&NewSession {
        name: "abandoned".to_string(),
        tool_name: "cursor".to_string(),
        scenario_type: "bug_fix".to_string(),
        developer_id: None,
        started_at: None,
        notes: None,
    })
    .unwrap();

    let engine = MetricsEngine::new(&db, ComparisonConfig::default());
    let stats = engine.summary_stats(Some("cursor"), None).unwrap().unwrap();
    assert_eq!(stats.total_sessions, 1);
}
