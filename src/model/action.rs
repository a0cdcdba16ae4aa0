//! Action types: validated, store-mutation-ready instructions.
//!
//! One action per resolved candidate. The entry it came from travels
//! alongside it rather than inside it.

use jiff::civil::DateTime;

use super::{Commitment, CommitmentStatus};

/// A fully validated instruction for the execution layer.
#[derive(Debug, Clone)]
pub enum Action {
    /// Record the entry in today's logs.
    Log,

    /// Record the entry as a correction note.
    Correction,

    /// Store a freshly created commitment.
    Commitment(Commitment),

    /// Move an existing commitment to a new status.
    Update(CommitmentUpdate),

    /// Something scheduled.
    Event(Event),

    /// Progress on a project.
    Progress(Progress),
}

/// A status change for a known commitment.
#[derive(Debug, Clone)]
pub struct CommitmentUpdate {
    pub commitment_id: String,
    pub new_status: CommitmentStatus,

    /// The extracted status text, kept verbatim for history.
    pub description: String,
}

/// A scheduled event. Date-only inputs land at midnight.
#[derive(Debug, Clone)]
pub struct Event {
    pub time: DateTime,
    pub person_id: Option<String>,
    pub project_id: Option<String>,
    pub title: String,
}

/// Progress on a project.
#[derive(Debug, Clone)]
pub struct Progress {
    pub project_id: String,
    pub status: String,
    pub notes: String,
}
