//! Candidate types: typed-but-untrusted extraction results.
//!
//! A candidate is decoded once at the extraction boundary. Each intent
//! carries its own field struct, so the resolver never has to search a
//! loose map. Every field is optional: absence becomes a question during
//! resolution, not a decode failure.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Hardness, Question};

/// An unvalidated extraction result awaiting resolution into an action.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub intent: Intent,

    /// Extractor confidence in `[0, 1]`.
    pub confidence: f64,

    /// Blocking questions raised by the extractor itself.
    pub questions: Vec<Question>,
}

/// The kind of intent, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    Log,
    Progress,
    Commitment,
    Update,
    Event,
    Correction,
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Log => "log",
            Self::Progress => "progress",
            Self::Commitment => "commitment",
            Self::Update => "update",
            Self::Event => "event",
            Self::Correction => "correction",
        };
        f.write_str(s)
    }
}

/// An intent with its typed payload.
#[derive(Debug, Clone)]
pub enum Intent {
    Log(TextFields),
    Progress(ProgressFields),
    Commitment(CommitmentFields),
    Update(UpdateFields),
    Event(EventFields),
    Correction(TextFields),
}

impl Intent {
    pub fn kind(&self) -> IntentType {
        match self {
            Self::Log(_) => IntentType::Log,
            Self::Progress(_) => IntentType::Progress,
            Self::Commitment(_) => IntentType::Commitment,
            Self::Update(_) => IntentType::Update,
            Self::Event(_) => IntentType::Event,
            Self::Correction(_) => IntentType::Correction,
        }
    }
}

/// Payload for `log` and `correction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextFields {
    pub text: Option<String>,
}

/// Payload for `progress`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressFields {
    pub project: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Payload for `commitment`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitmentFields {
    pub person: Option<String>,
    pub project: Option<String>,
    pub expectation: Option<ExpectationFields>,
}

/// What was promised, as extracted.
///
/// The deadline stays a string here; its `YYYY-MM-DD` format is checked
/// during resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpectationFields {
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub hardness: Option<Hardness>,
}

/// Payload for `update`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFields {
    pub commitment_id: Option<String>,
    pub person: Option<String>,
    pub project: Option<String>,
    pub status: Option<String>,
}

/// Payload for `event`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFields {
    pub time: Option<String>,
    pub person: Option<String>,
    pub project: Option<String>,
    pub title: Option<String>,
}
