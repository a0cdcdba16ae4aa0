//! Extraction: turning free text into an untrusted [`Candidate`].
//!
//! The extractor itself is a collaborator behind the [`Extractor`] trait.
//! Whatever it returns is decoded once, by [`decode_candidate`], into the
//! typed candidate model; nothing downstream sees raw JSON.

mod decode;
mod gemini;
mod mock;

use jiff::Zoned;
use thiserror::Error;

use crate::model::{Candidate, Question};

pub use decode::{DecodeError, decode_candidate};
pub use gemini::{DEFAULT_MODEL as DEFAULT_GEMINI_MODEL, GeminiExtractor};
pub use mock::MockExtractor;

/// Candidates below this confidence are rejected during resolution.
pub const MIN_CONFIDENCE: f64 = 0.7;

/// Raw payloads quoted in errors are cut to this many characters.
const PAYLOAD_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no Gemini API key: set GEMINI_API_KEY or gemini-api-key in config.toml")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("gemini API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("no content in response")]
    EmptyResponse,

    #[error("could not decode extraction: {reason}\n  input: {input:?}\n  payload: {payload}")]
    Decode {
        reason: DecodeError,
        input: String,
        payload: String,
    },
}

impl ExtractError {
    /// A decode failure quoting the input and a preview of the payload.
    pub fn decode(reason: DecodeError, input: &str, payload: &[u8]) -> Self {
        Self::Decode {
            reason,
            input: input.to_string(),
            payload: preview(&String::from_utf8_lossy(payload)),
        }
    }
}

/// An extraction result: the candidate and any blocking questions raised
/// by the extractor.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub candidate: Candidate,
    pub questions: Vec<Question>,
}

impl From<Candidate> for Extraction {
    fn from(candidate: Candidate) -> Self {
        let questions = candidate.questions.clone();
        Self {
            candidate,
            questions,
        }
    }
}

/// Something that can turn free text into a candidate.
///
/// `now` anchors relative dates ("tomorrow", "next week").
pub trait Extractor {
    fn extract(&self, input: &str, now: &Zoned) -> Result<Extraction, ExtractError>;
}

/// Decodes `payload` as a candidate, wrapping failures with the input.
fn decode_extraction(input: &str, payload: &[u8]) -> Result<Extraction, ExtractError> {
    decode_candidate(payload)
        .map(Extraction::from)
        .map_err(|e| ExtractError::decode(e, input, payload))
}

fn preview(payload: &str) -> String {
    match payload.char_indices().nth(PAYLOAD_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}... (truncated)", &payload[..cut]),
        None => payload.to_string(),
    }
}
