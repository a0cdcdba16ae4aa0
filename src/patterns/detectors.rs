//! The individual deviation detectors.

use std::collections::BTreeMap;

use jiff::{SignedDuration, Timestamp, tz::TimeZone};
use tracing::debug;

use crate::model::{
    Commitment, CommitmentStatus, DailyStats, Deviation, PatternType, Question, RollingStats,
    Severity,
};

/// Expected start hour when there is no baseline.
const IDEAL_WORK_START_HOUR: i8 = 9;

/// Hours past the expected start before a start counts as late.
const LATE_START_THRESHOLD_HOURS: i8 = 2;

/// Fraction of the average log count below which a day is sparse.
const SPARSE_LOG_RATIO: f64 = 0.5;

const SILENCE_THRESHOLD: SignedDuration = SignedDuration::from_hours(3 * 24);

const STALL_WINDOW: SignedDuration = SignedDuration::from_hours(24);

const REPEATED_VIOLATION_COUNT: usize = 2;

/// Fires `medium` when today's work started more than two hours after the
/// usual hour (the baseline average, or 09:00 without one).
pub fn detect_late_start(today: &DailyStats, rolling: &RollingStats) -> Option<Deviation> {
    let start = today.work_start_time?;
    let ideal_hour = rolling
        .avg_work_start_time
        .map_or(IDEAL_WORK_START_HOUR, |t| t.hour());

    let hour = start.hour();
    if hour <= ideal_hour + LATE_START_THRESHOLD_HOURS {
        return None;
    }

    debug!(hour, ideal_hour, "late start");
    Some(Deviation {
        pattern: PatternType::LateStart,
        severity: Severity::Medium,
        question: Question::optional(
            "late_start",
            format!(
                "started work at {hour}:00, {} hours later than usual. what happened?",
                hour - ideal_hour
            ),
            "work_start",
        ),
    })
}

/// Fires `low` when today has under half the average log count and fewer
/// than the (truncated) average. Needs a non-empty baseline.
pub fn detect_sparse_logs(today: &DailyStats, rolling: &RollingStats) -> Option<Deviation> {
    if rolling.days == 0 || rolling.avg_log_count == 0.0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = today.log_count as f64;
    let ratio = count / rolling.avg_log_count;
    if ratio >= SPARSE_LOG_RATIO || count >= rolling.avg_log_count.trunc() {
        return None;
    }

    debug!(count = today.log_count, avg = rolling.avg_log_count, "sparse logs");
    Some(Deviation {
        pattern: PatternType::SparseLogs,
        severity: Severity::Low,
        question: Question::optional(
            "sparse_logs",
            format!(
                "only {} log entries today (avg: {:.1}). anything notable?",
                today.log_count, rolling.avg_log_count
            ),
            "logs",
        ),
    })
}

/// Fires `high` once per open commitment with no activity for over three days.
pub fn detect_commitment_silence(open: &[Commitment], now: Timestamp) -> Vec<Deviation> {
    open.iter()
        .filter(|c| c.is_open())
        .filter_map(|c| {
            let silence = now.duration_since(c.last_activity());
            if silence <= SILENCE_THRESHOLD {
                return None;
            }
            let days = silence.as_secs() / 86_400;
            debug!(commitment = %c.id, days, "commitment silence");
            Some(Deviation {
                pattern: PatternType::CommitmentSilence,
                severity: Severity::High,
                question: Question::optional(
                    format!("commitment_silence_{}", c.id),
                    format!(
                        "no update on commitment to {} ({}) in {days} days. still on track?",
                        c.person_id, c.expectation.description
                    ),
                    "commitment_update",
                ),
            })
        })
        .collect()
}

/// Fires `high` for each person with two or more violated commitments,
/// in person-id order.
pub fn detect_repeated_violations(all: &[Commitment]) -> Vec<Deviation> {
    let mut violations: BTreeMap<&str, usize> = BTreeMap::new();
    for c in all.iter().filter(|c| c.status == CommitmentStatus::Violated) {
        *violations.entry(c.person_id.as_str()).or_default() += 1;
    }

    violations
        .into_iter()
        .filter(|&(_, count)| count >= REPEATED_VIOLATION_COUNT)
        .map(|(person, count)| Deviation {
            pattern: PatternType::RepeatedViolations,
            severity: Severity::High,
            question: Question::optional(
                format!("repeated_violations_{person}"),
                format!("{count} violated commitments with {person}. pattern?"),
                "violations",
            ),
        })
        .collect()
}

/// Fires `medium` for updated-but-unfulfilled commitments with at least two
/// history entries whose deadline is less than a day away or already past.
pub fn detect_optimistic_stall(open: &[Commitment], now: Timestamp) -> Vec<Deviation> {
    open.iter()
        .filter(|c| c.status == CommitmentStatus::Updated && c.history.len() >= 2)
        .filter_map(|c| {
            let deadline = c
                .expectation
                .deadline
                .at(0, 0, 0, 0)
                .to_zoned(TimeZone::UTC)
                .ok()?
                .timestamp();
            if deadline.duration_since(now) >= STALL_WINDOW {
                return None;
            }
            Some(Deviation {
                pattern: PatternType::OptimisticStall,
                severity: Severity::Medium,
                question: Question::optional(
                    format!("optimistic_stall_{}", c.id),
                    format!(
                        "commitment to {} ({}) updated {} times but not fulfilled. deadline: {}. status?",
                        c.person_id,
                        c.expectation.description,
                        c.history.len(),
                        c.expectation.deadline
                    ),
                    "commitment_status",
                ),
            })
        })
        .collect()
}
