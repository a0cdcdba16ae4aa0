//! Commitment types: promises made to people, and their lifecycle.

use std::fmt;

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};

/// A promise made to a person, optionally scoped to a project.
///
/// `history` is append-only and time-ordered. Commitments are never
/// deleted, only archived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commitment {
    pub id: String,
    pub created_at: Timestamp,

    /// The entry this commitment was extracted from.
    pub source_entry_id: String,

    pub person_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    pub expectation: Expectation,
    pub status: CommitmentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_at: Option<Timestamp>,

    #[serde(default)]
    pub history: Vec<CommitmentEvent>,
}

impl Commitment {
    /// When this commitment last changed: the last update, or creation.
    pub fn last_activity(&self) -> Timestamp {
        self.last_update_at.unwrap_or(self.created_at)
    }

    /// Open or updated: still awaiting fulfilment.
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            CommitmentStatus::Open | CommitmentStatus::Updated
        )
    }
}

/// What is expected, by when, and how firmly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectation {
    pub description: String,
    pub deadline: Date,
    pub hardness: Hardness,
}

/// How firm a deadline is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hardness {
    Hard,
    #[default]
    Soft,
}

/// Where a commitment stands.
///
/// `draft → open → {updated ⇄ open} → {fulfilled | violated | archived}`.
/// The last three are intended terminal, but nothing here refuses a
/// further transition out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentStatus {
    Draft,
    Open,
    Updated,
    Fulfilled,
    Violated,
    Archived,
}

impl fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Open => "open",
            Self::Updated => "updated",
            Self::Fulfilled => "fulfilled",
            Self::Violated => "violated",
            Self::Archived => "archived",
        };
        f.write_str(s)
    }
}

/// One entry in a commitment's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitmentEvent {
    pub timestamp: Timestamp,
    pub kind: CommitmentEventKind,

    #[serde(default)]
    pub description: String,
}

/// What happened to a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentEventKind {
    Created,
    Updated,
    Fulfilled,
    Violated,
    Archived,
}

impl CommitmentEventKind {
    /// The history event recorded when a commitment moves into `status`.
    pub fn for_status(status: CommitmentStatus) -> Self {
        match status {
            CommitmentStatus::Draft | CommitmentStatus::Open => Self::Created,
            CommitmentStatus::Updated => Self::Updated,
            CommitmentStatus::Fulfilled => Self::Fulfilled,
            CommitmentStatus::Violated => Self::Violated,
            CommitmentStatus::Archived => Self::Archived,
        }
    }
}
