//! Pattern evaluation: compare today against the rolling baseline and the
//! commitment set, and turn what stands out into questions.
//!
//! Detectors are pure functions over stats and commitments. [`evaluate`]
//! loads their inputs and concatenates their output in a fixed order:
//! late start, sparse logs, commitment silence, repeated violations,
//! optimistic stall. Ranking by severity happens in [`rank_questions`].

mod detectors;
mod questions;

use jiff::{Timestamp, civil::Date};
use tracing::debug;

use crate::{
    model::{Deviation, RollingStats},
    stats,
    storage::{self, Storage},
};

use detectors::{
    detect_commitment_silence, detect_late_start, detect_optimistic_stall,
    detect_repeated_violations, detect_sparse_logs,
};
pub use questions::{DEFAULT_MAX_QUESTIONS, rank_questions};

/// Evaluates every detector for `date` against `rolling`.
///
/// Commitment silence and optimistic stall are measured at `now`. Any read
/// failure aborts the whole evaluation; there are no partial results.
pub fn evaluate(
    storage: &Storage,
    date: Date,
    rolling: &RollingStats,
    now: Timestamp,
) -> storage::Result<Vec<Deviation>> {
    let today = stats::compute_daily_stats(storage, date)?;
    let open = storage.list_open_commitments()?;
    let all = storage.list_commitments()?;

    let mut deviations = Vec::new();
    deviations.extend(detect_late_start(&today, rolling));
    deviations.extend(detect_sparse_logs(&today, rolling));
    deviations.extend(detect_commitment_silence(&open, now));
    deviations.extend(detect_repeated_violations(&all));
    deviations.extend(detect_optimistic_stall(&open, now));

    debug!(%date, count = deviations.len(), "evaluated patterns");
    Ok(deviations)
}
