//! Core data model for Grechen.
//!
//! These types represent the life-tracking domain: entries, extraction
//! candidates, resolved actions, commitments, people, projects, daily
//! statistics, and the deviations surfaced from them.

mod action;
mod candidate;
mod commitment;
mod deviation;
mod entity;
mod entry;
mod question;
mod stats;

pub use action::{Action, CommitmentUpdate, Event, Progress};
pub use candidate::{
    Candidate, CommitmentFields, EventFields, ExpectationFields, Intent, IntentType,
    ProgressFields, TextFields, UpdateFields,
};
pub use commitment::{
    Commitment, CommitmentEvent, CommitmentEventKind, CommitmentStatus, Expectation, Hardness,
};
pub use deviation::{Deviation, PatternType, Severity};
pub use entity::{Person, Project};
pub use entry::Entry;
pub use question::Question;
pub use stats::{DailyStats, RollingStats};
