//! Decoding raw extraction payloads into typed candidates.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{Candidate, Intent, IntentType, Question};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {intent} data: {source}")]
    Data {
        intent: IntentType,
        source: serde_json::Error,
    },

    #[error("confidence {0} is outside [0, 1]")]
    Confidence(f64),
}

/// The wire shape: `{type, confidence, data, questions}`.
#[derive(Deserialize)]
struct RawCandidate {
    #[serde(rename = "type")]
    kind: IntentType,
    confidence: f64,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    questions: Vec<Question>,
}

/// Decodes a raw payload into a [`Candidate`].
///
/// Unknown intent types, wrong-typed fields, and bad hardness values are
/// rejected here. Missing fields are not: they stay `None` and become
/// questions during resolution. Unknown fields are ignored.
pub fn decode_candidate(payload: &[u8]) -> Result<Candidate, DecodeError> {
    let raw: RawCandidate = serde_json::from_slice(payload)?;
    if !(0.0..=1.0).contains(&raw.confidence) {
        return Err(DecodeError::Confidence(raw.confidence));
    }

    let data = match raw.data {
        serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
        other => other,
    };
    let intent = match raw.kind {
        IntentType::Log => Intent::Log(fields(raw.kind, data)?),
        IntentType::Progress => Intent::Progress(fields(raw.kind, data)?),
        IntentType::Commitment => Intent::Commitment(fields(raw.kind, data)?),
        IntentType::Update => Intent::Update(fields(raw.kind, data)?),
        IntentType::Event => Intent::Event(fields(raw.kind, data)?),
        IntentType::Correction => Intent::Correction(fields(raw.kind, data)?),
    };

    Ok(Candidate {
        intent,
        confidence: raw.confidence,
        questions: raw.questions,
    })
}

fn fields<T: DeserializeOwned>(intent: IntentType, data: serde_json::Value) -> Result<T, DecodeError> {
    serde_json::from_value(data).map_err(|source| DecodeError::Data { intent, source })
}
