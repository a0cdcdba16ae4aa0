//! Questions: clarifications asked of the user.

use serde::{Deserialize, Serialize};

/// A question for the user. Identity is `id`; ranking deduplicates on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,

    /// Whether processing is blocked until this is answered.
    #[serde(default)]
    pub required: bool,

    /// The field this question is about (e.g. `expectation.deadline`).
    #[serde(default)]
    pub field: String,
}

impl Question {
    /// A blocking question about a missing or unresolvable field.
    pub fn required(id: impl Into<String>, text: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            required: true,
            field: field.into(),
        }
    }

    /// A non-blocking, reflective question.
    pub fn optional(id: impl Into<String>, text: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            required: false,
            field: field.into(),
        }
    }
}
