//! Text rendering for report output
//!
//! JSON output comes straight from serde; this module only formats the
//! human-readable views.

use codetrial_core::metrics::{ComparisonMetrics, PreferenceWinner, SessionMetrics, SummaryStats};
use codetrial_core::Session;

pub fn print_session_table(sessions: &[Session]) {
    println!(
        "{:>5}  {:<20}  {:<16}  {:<14}  {:<11}  {}",
        "ID", "NAME", "TOOL", "SCENARIO", "STATUS", "STARTED"
    );
    for session in sessions {
        println!(
            "{:>5}  {:<20}  {:<16}  {:<14}  {:<11}  {}",
            session.id,
            truncate(&session.name, 20),
            truncate(&session.tool_name, 16),
            truncate(&session.scenario_type, 14),
            session.status,
            session.started_at.format("%Y-%m-%d %H:%M"),
        );
    }
}

pub fn print_session_metrics(metrics: &SessionMetrics) {
    println!(
        "Session {}: {} ({} / {})",
        metrics.session_id, metrics.session_name, metrics.tool_name, metrics.scenario_type
    );
    println!(
        "  Status: {}, duration {:.1} min",
        metrics.status, metrics.total_duration_minutes
    );

    println!("\nAI usage:");
    println!(
        "  Interactions: {} ({:.1}/hour)",
        metrics.total_ai_interactions, metrics.ai_interactions_per_hour
    );
    println!(
        "  Average quality rating: {:.2}/5",
        metrics.average_quality_rating
    );
    println!(
        "  Helpful: {:.0}%",
        metrics.helpful_interactions_percentage
    );
    if metrics.total_tokens_used > 0 {
        println!("  Tokens: {}", metrics.total_tokens_used);
    }
    if metrics.total_cost_estimate > 0.0 {
        println!("  Cost: ${:.4}", metrics.total_cost_estimate);
    }

    println!("\nCode activity:");
    println!(
        "  Changes: {} (+{} / -{} / ~{} lines, {} files)",
        metrics.total_code_changes,
        metrics.lines_added,
        metrics.lines_deleted,
        metrics.lines_modified,
        metrics.unique_files
    );
    println!(
        "  AI-generated changes: {} (assistance ratio {:.2})",
        metrics.ai_generated_changes, metrics.ai_assistance_ratio
    );
    println!(
        "  Productivity: {:.2} lines/min, {:.1} files/hour",
        metrics.lines_per_minute, metrics.files_per_hour
    );

    println!("\nBuilds:");
    println!("  Success rate: {:.1}%", metrics.build_success_rate);
    println!("  Test pass rate: {:.1}%", metrics.test_pass_rate);
    println!("  Code quality score: {:.1}", metrics.code_quality_score);

    if metrics.total_phases > 0 || !metrics.open_phases.is_empty() {
        println!("\nPhases:");
        for (name, duration) in &metrics.phase_durations {
            let ai_usage = metrics.phase_ai_usage.get(name).copied().unwrap_or(0);
            println!(
                "  {}: {:.1} min ({} AI interactions)",
                name, duration, ai_usage
            );
        }
        for name in &metrics.open_phases {
            println!("  {}: still open", name);
        }
    }

    println!("\nFeedback:");
    print_rating("Ease of use", metrics.ease_of_use_rating);
    print_rating("Productivity", metrics.productivity_rating);
    print_rating("Overall satisfaction", metrics.satisfaction_rating);
    match metrics.would_recommend {
        Some(recommend) => println!(
            "  Would recommend: {}",
            if recommend { "yes" } else { "no" }
        ),
        None if metrics.satisfaction_rating.is_none() => println!("  (none recorded)"),
        None => {}
    }
}

fn print_rating(label: &str, rating: Option<i32>) {
    if let Some(rating) = rating {
        println!("  {}: {}/5", label, rating);
    }
}

pub fn print_comparison(cmp: &ComparisonMetrics) {
    println!("{} vs {}", cmp.tool_a, cmp.tool_b);
    if let Some(scenario) = &cmp.scenario_type {
        println!("Scenario: {}", scenario);
    }
    println!(
        "Sessions: {} ({}) vs {} ({})",
        cmp.sample_size_a, cmp.tool_a, cmp.sample_size_b, cmp.tool_b
    );
    println!("---");
    println!(
        "  Speed:        {:+.1}%",
        cmp.speed_improvement_percentage
    );
    println!(
        "  Quality:      {:+.1}%",
        cmp.quality_difference_percentage
    );
    println!(
        "  Productivity: {:+.1}%",
        cmp.productivity_difference_percentage
    );
    println!(
        "  Interactions: {:+.1} per session",
        cmp.interaction_difference
    );
    println!("  Tokens:       {:+.0} per session", cmp.token_difference);
    println!("  Cost:         {:+.4} per session", cmp.cost_difference);
    println!("---");
    match (cmp.satisfaction_a, cmp.satisfaction_b) {
        (Some(a), Some(b)) => println!("  Satisfaction: {:.2} vs {:.2}", a, b),
        _ => println!("  Satisfaction: not enough feedback"),
    }
    let winner = match cmp.preference_winner {
        PreferenceWinner::ToolA => cmp.tool_a.as_str(),
        PreferenceWinner::ToolB => cmp.tool_b.as_str(),
        PreferenceWinner::Tie => "tie",
    };
    println!("  Preference:   {}", winner);
}

pub fn print_summary(stats: &SummaryStats) {
    match (&stats.tool_name, &stats.scenario_type) {
        (Some(tool), Some(scenario)) => println!("Summary: {} / {}", tool, scenario),
        (Some(tool), None) => println!("Summary: {}", tool),
        (None, Some(scenario)) => println!("Summary: all tools / {}", scenario),
        (None, None) => println!("Summary: all completed sessions"),
    }
    println!("Sessions: {}", stats.total_sessions);
    println!(
        "{:<18}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}",
        "METRIC", "MEAN", "MEDIAN", "MIN", "MAX", "STDDEV"
    );
    print_row("duration (min)", &stats.duration);
    print_row("interactions", &stats.interactions);
    print_row("lines/min", &stats.productivity);
    print_row("quality score", &stats.quality);
    match &stats.satisfaction {
        Some(satisfaction) => println!(
            "{:<18}  {:>9.2}  (over {} session(s) with feedback)",
            "satisfaction", satisfaction.mean, satisfaction.count
        ),
        None => println!("{:<18}  (no feedback recorded)", "satisfaction"),
    }
}

fn print_row(label: &str, d: &codetrial_core::metrics::DistributionSummary) {
    println!(
        "{:<18}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9.2}",
        label, d.mean, d.median, d.min, d.max, d.std_dev
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
