//! Daily statistics and the rolling baseline built from them.
//!
//! Stats are read back out of the day files by line heuristics:
//!
//! - `log_count`: list items in the `logs` section.
//! - `work_start_time`: the first `logs` item mentioning work ("work",
//!   "start", "coding", "sitting") whose text opens with a valid `HHMM`.
//! - `progress_entries`: every line in the file, any section, mentioning
//!   "done", "finished", "completed", or "progress". This is not scoped to
//!   a section, so a progress log line also counted in `log_count` is
//!   counted here too. Known limitation, kept as-is.
//! - `commitment_updates`: list items in the `commitments` section.

use jiff::{
    Span,
    civil::{Date, Time},
};

use crate::{
    model::{DailyStats, RollingStats},
    storage::{self, Section, Storage, section_items},
};

const WORK_KEYWORDS: &[&str] = &["work", "start", "coding", "sitting"];
const PROGRESS_KEYWORDS: &[&str] = &["done", "finished", "completed", "progress"];

/// Computes one day's stats from its file. Fails only if the file can't be read.
pub fn compute_daily_stats(storage: &Storage, date: Date) -> storage::Result<DailyStats> {
    let content = storage.read_daily(date)?;
    Ok(daily_stats_from(&content, date))
}

/// Computes the baseline over `window_days` days ending at `end`, inclusive.
///
/// Fails fast on the first unreadable day.
pub fn compute_rolling_stats(
    storage: &Storage,
    end: Date,
    window_days: usize,
) -> storage::Result<RollingStats> {
    let days = end
        .series(Span::new().days(-1))
        .take(window_days)
        .map(|date| compute_daily_stats(storage, date))
        .collect::<storage::Result<Vec<_>>>()?;
    Ok(aggregate(&days))
}

/// Derives stats from a day's raw text.
pub fn daily_stats_from(content: &str, date: Date) -> DailyStats {
    DailyStats {
        date,
        log_count: section_items(content, Section::Logs).count(),
        work_start_time: find_work_start(content),
        progress_entries: content
            .split('\n')
            .filter(|line| contains_any(&line.to_lowercase(), PROGRESS_KEYWORDS))
            .count(),
        commitment_updates: section_items(content, Section::Commitments).count(),
    }
}

/// Averages a window of daily stats.
///
/// Counts are averaged over every day in the window, data or not. The work
/// start is averaged (by minute of day) over only the days that had one.
pub fn aggregate(days: &[DailyStats]) -> RollingStats {
    if days.is_empty() {
        return RollingStats::default();
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = |total: usize| total as f64 / days.len() as f64;

    let starts: Vec<i32> = days
        .iter()
        .filter_map(|d| d.work_start_time)
        .map(|t| i32::from(t.hour()) * 60 + i32::from(t.minute()))
        .collect();
    let avg_work_start_time = if starts.is_empty() {
        None
    } else {
        let len = i32::try_from(starts.len()).unwrap_or(i32::MAX);
        let minutes = starts.iter().sum::<i32>() / len;
        minute_of_day(minutes)
    };

    RollingStats {
        avg_log_count: mean(days.iter().map(|d| d.log_count).sum()),
        avg_work_start_time,
        avg_progress_entries: mean(days.iter().map(|d| d.progress_entries).sum()),
        avg_commitment_updates: mean(days.iter().map(|d| d.commitment_updates).sum()),
        days: days.iter().filter(|d| d.has_data()).count(),
    }
}

fn find_work_start(content: &str) -> Option<Time> {
    section_items(content, Section::Logs)
        .filter(|item| contains_any(&item.to_lowercase(), WORK_KEYWORDS))
        .find_map(parse_hhmm_prefix)
}

/// Parses the `HHMM` after the `- ` of a log item.
fn parse_hhmm_prefix(item: &str) -> Option<Time> {
    if item.len() <= 6 {
        return None;
    }
    let text = item.strip_prefix("- ")?;
    let digits = text.as_bytes().get(..4)?;
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let hour: i8 = text[..2].parse().ok()?;
    let minute: i8 = text[2..4].parse().ok()?;
    Time::new(hour, minute, 0, 0).ok()
}

fn minute_of_day(minutes: i32) -> Option<Time> {
    let hour = i8::try_from(minutes / 60).ok()?;
    let minute = i8::try_from(minutes % 60).ok()?;
    Time::new(hour, minute, 0, 0).ok()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
