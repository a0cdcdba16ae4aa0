//! Deviations: divergences between today and the rolling baseline.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Question;

/// A detected divergence, with the question it raises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deviation {
    pub pattern: PatternType,
    pub severity: Severity,
    pub question: Question,
}

/// Which detector fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    LateStart,
    SparseLogs,
    CommitmentSilence,
    RepeatedViolations,
    OptimisticStall,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LateStart => "late_start",
            Self::SparseLogs => "sparse_logs",
            Self::CommitmentSilence => "commitment_silence",
            Self::RepeatedViolations => "repeated_violations",
            Self::OptimisticStall => "optimistic_stall",
        };
        f.write_str(s)
    }
}

/// How urgent a deviation is. Ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}
