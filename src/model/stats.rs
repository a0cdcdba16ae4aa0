//! Derived statistics. Recomputed on demand, never stored.

use jiff::civil::{Date, Time};

/// What one day's file says about that day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: Date,
    pub log_count: usize,

    /// Heuristic: the first work-looking log item with an `HHMM` prefix.
    pub work_start_time: Option<Time>,

    /// Lines anywhere in the file mentioning progress keywords.
    pub progress_entries: usize,

    pub commitment_updates: usize,
}

impl DailyStats {
    /// True if any statistic for the day is non-zero.
    pub fn has_data(&self) -> bool {
        self.log_count > 0
            || self.work_start_time.is_some()
            || self.progress_entries > 0
            || self.commitment_updates > 0
    }
}

/// Averages over a trailing window of days.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollingStats {
    pub avg_log_count: f64,

    /// Mean minute-of-day over days that had a work start, if any did.
    pub avg_work_start_time: Option<Time>,

    pub avg_progress_entries: f64,
    pub avg_commitment_updates: f64,

    /// How many days in the window contributed data. Zero means no baseline.
    pub days: usize,
}
