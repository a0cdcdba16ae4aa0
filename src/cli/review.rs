//! Reflection commands: today, todo, review, goodnight.

use jiff::{Zoned, civil::Date};

use crate::{
    config::Config,
    patterns, stats,
    storage::{Section, Storage},
};

use super::format::{format_days_left, format_deviation, format_log_item, goodnight_note};

pub(super) fn cmd_today(storage: &Storage) -> Result<(), String> {
    let today = Zoned::now().date();

    let stats = stats::compute_daily_stats(storage, today)
        .map_err(|e| format!("failed to read today: {e}"))?;
    println!("today ({today})");
    println!("  logs: {}", stats.log_count);
    if let Some(start) = stats.work_start_time {
        println!("  work started: {}", start.strftime("%H:%M"));
    }
    println!("  progress entries: {}", stats.progress_entries);
    println!("  commitment updates: {}", stats.commitment_updates);

    let logs = storage
        .read_section(today, Section::Logs)
        .map_err(|e| format!("failed to read today's logs: {e}"))?;
    let items: Vec<&String> = logs.iter().filter(|l| l.starts_with("- ")).collect();
    if !items.is_empty() {
        println!("\nlogs:");
        for item in items {
            println!("  {}", format_log_item(item));
        }
    }

    let open = storage
        .list_open_commitments()
        .map_err(|e| format!("failed to list commitments: {e}"))?;
    if !open.is_empty() {
        let overdue = storage
            .list_commitments_due_before(today)
            .map_err(|e| format!("failed to list commitments: {e}"))?;
        println!("\nopen commitments ({} overdue):", overdue.len());
        for c in &open {
            println!(
                "  {} → {} (due {}, {})",
                c.person_id,
                c.expectation.description,
                c.expectation.deadline,
                format_days_left(days_between(today, c.expectation.deadline))
            );
        }
    }

    Ok(())
}

pub(super) fn cmd_todo(storage: &Storage) -> Result<(), String> {
    let now = Zoned::now();
    let today = now.date();
    let start_of_today = today
        .to_zoned(now.time_zone().clone())
        .map_err(|e| format!("failed to find start of day: {e}"))?;

    let carried = storage
        .list_open_commitments_created_before(start_of_today.timestamp())
        .map_err(|e| format!("failed to list commitments: {e}"))?;
    if carried.is_empty() {
        println!("no remaining todos from previous days");
        return Ok(());
    }

    println!("remaining todos ({}):", carried.len());
    for (i, c) in carried.iter().enumerate() {
        let created = c.created_at.to_zoned(now.time_zone().clone()).date();
        println!(
            "  {}. {} → {} (created {} days ago, due {}, {})",
            i + 1,
            c.person_id,
            c.expectation.description,
            days_between(created, today),
            c.expectation.deadline,
            format_days_left(days_between(today, c.expectation.deadline))
        );
        if let Some(project) = &c.project_id {
            println!("     project: {project}");
        }
    }
    Ok(())
}

pub(super) fn cmd_review(config: &Config, storage: &Storage) -> Result<(), String> {
    let now = Zoned::now();
    let today = now.date();

    let rolling = stats::compute_rolling_stats(storage, today, config.window_days)
        .map_err(|e| format!("failed to compute stats: {e}"))?;
    println!("last {} days:", config.window_days);
    println!("  avg logs/day: {:.1}", rolling.avg_log_count);
    if let Some(start) = rolling.avg_work_start_time {
        println!("  avg work start: {}", start.strftime("%H:%M"));
    }
    println!("  avg progress entries/day: {:.1}", rolling.avg_progress_entries);
    println!("  avg commitment updates/day: {:.1}", rolling.avg_commitment_updates);

    let deviations = patterns::evaluate(storage, today, &rolling, now.timestamp())
        .map_err(|e| format!("failed to evaluate patterns: {e}"))?;
    if !deviations.is_empty() {
        println!("\npatterns:");
        for deviation in &deviations {
            println!("  {}", format_deviation(deviation));
        }
    }
    Ok(())
}

pub(super) fn cmd_goodnight(config: &Config, storage: &Storage) -> Result<(), String> {
    let now = Zoned::now();
    let today = now.date();

    let today_stats = stats::compute_daily_stats(storage, today)
        .map_err(|e| format!("failed to read today: {e}"))?;
    let rolling = stats::compute_rolling_stats(storage, today, config.window_days)
        .map_err(|e| format!("failed to compute stats: {e}"))?;
    let deviations = patterns::evaluate(storage, today, &rolling, now.timestamp())
        .map_err(|e| format!("failed to evaluate patterns: {e}"))?;
    let questions = patterns::rank_questions(&deviations, config.max_questions);

    println!("goodnight");
    let mut summary = format!("today: {} logs, ", today_stats.log_count);
    if let Some(start) = today_stats.work_start_time {
        summary.push_str(&format!("started at {}, ", start.strftime("%H:%M")));
    }
    summary.push_str(&format!("{} progress entries", today_stats.progress_entries));
    println!("{summary}");

    if rolling.days > 0 {
        let mut baseline = format!("vs avg: {:.1} logs/day", rolling.avg_log_count);
        if let Some(start) = rolling.avg_work_start_time {
            baseline.push_str(&format!(", start at {}", start.strftime("%H:%M")));
        }
        println!("{baseline}");
    }

    if questions.is_empty() {
        println!("\nno questions today");
        return Ok(());
    }

    println!("\nquestions:");
    for (i, q) in questions.iter().enumerate() {
        println!("{}. {}", i + 1, q.text);
    }
    storage
        .append_note(today, &goodnight_note(&questions))
        .map_err(|e| format!("failed to append questions: {e}"))?;
    Ok(())
}

/// Whole days from `from` to `to`; negative if `to` is earlier.
fn days_between(from: Date, to: Date) -> i32 {
    (to - from).get_days()
}
