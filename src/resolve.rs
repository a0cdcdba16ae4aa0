//! Resolution: validating a candidate into an [`Action`], or into the
//! questions that block it.
//!
//! Validation never drops a candidate silently. Missing or unresolvable
//! fields become required [`Question`]s; only a malformed deadline or event
//! time, a confidence below [`MIN_CONFIDENCE`], or a storage failure is an
//! error.
//!
//! Resolving a commitment or progress candidate provisions the people and
//! projects it names (see [`Storage::ensure_person`]), even when other
//! fields later send the candidate back with questions.

mod commitment;
mod update;

use jiff::Timestamp;
use thiserror::Error;
use tracing::debug;

use crate::{
    extract::MIN_CONFIDENCE,
    model::{Action, Candidate, Entry, Intent, Question},
    storage::{Storage, StorageError},
};

use update::validate_event;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("confidence too low: {confidence:.2} < {minimum:.2}")]
    LowConfidence { confidence: f64, minimum: f64 },

    #[error("invalid deadline {value:?}: expected YYYY-MM-DD")]
    InvalidDeadline {
        value: String,
        #[source]
        source: jiff::Error,
    },

    #[error("invalid event time {value:?}: expected YYYY-MM-DD HH:MM or YYYY-MM-DD")]
    InvalidEventTime { value: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, ResolveError>;

/// The outcome of validating a candidate.
#[derive(Debug)]
pub enum Validation {
    /// Ready to execute.
    Valid(Action),

    /// Blocked until every question is answered. Nothing should execute.
    Invalid(Vec<Question>),
}

/// Source of fresh record ids.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Validates candidates against the store.
pub struct Resolver<'a> {
    storage: &'a Storage,
    ids: &'a dyn IdGenerator,
}

impl<'a> Resolver<'a> {
    pub fn new(storage: &'a Storage, ids: &'a dyn IdGenerator) -> Self {
        Self { storage, ids }
    }

    /// Validates `candidate`, which was extracted from `entry`, at `now`.
    pub fn validate(
        &self,
        candidate: &Candidate,
        entry: &Entry,
        now: Timestamp,
    ) -> Result<Validation> {
        if candidate.confidence < MIN_CONFIDENCE {
            return Err(ResolveError::LowConfidence {
                confidence: candidate.confidence,
                minimum: MIN_CONFIDENCE,
            });
        }

        let validation = match &candidate.intent {
            Intent::Log(_) => Validation::Valid(Action::Log),
            Intent::Correction(_) => Validation::Valid(Action::Correction),
            Intent::Commitment(fields) => self.validate_commitment(fields, entry, now)?,
            Intent::Update(fields) => self.validate_update(fields)?,
            Intent::Progress(fields) => self.validate_progress(fields)?,
            Intent::Event(fields) => validate_event(fields)?,
        };

        match &validation {
            Validation::Valid(_) => debug!(intent = %candidate.intent.kind(), "candidate resolved"),
            Validation::Invalid(qs) => {
                debug!(intent = %candidate.intent.kind(), questions = qs.len(), "candidate blocked");
            }
        }
        Ok(validation)
    }
}

/// A present, non-empty string field.
fn non_empty(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use jiff::{civil::date, tz::TimeZone};
    use tempfile::TempDir;

    use crate::model::TextFields;

    /// Hands out `id-1`, `id-2`, ...
    pub(super) struct SequentialIds(Cell<u32>);

    impl SequentialIds {
        pub(super) fn new() -> Self {
            Self(Cell::new(0))
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            let next = self.0.get() + 1;
            self.0.set(next);
            format!("id-{next}")
        }
    }

    pub(super) fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        (dir, storage)
    }

    pub(super) fn now() -> Timestamp {
        date(2024, 3, 8)
            .at(10, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp()
    }

    pub(super) fn entry(raw: &str) -> Entry {
        Entry {
            id: "entry-1".into(),
            timestamp: now().to_zoned(TimeZone::UTC),
            raw: raw.into(),
        }
    }

    pub(super) fn candidate(intent: Intent, confidence: f64) -> Candidate {
        Candidate {
            intent,
            confidence,
            questions: vec![],
        }
    }

    #[test]
    fn log_and_correction_are_always_valid() {
        let (_dir, storage) = test_storage();
        let ids = SequentialIds::new();
        let resolver = Resolver::new(&storage, &ids);

        let log = candidate(Intent::Log(TextFields::default()), 0.9);
        assert!(matches!(
            resolver.validate(&log, &entry("coffee"), now()).unwrap(),
            Validation::Valid(Action::Log)
        ));

        let correction = candidate(Intent::Correction(TextFields::default()), 0.7);
        assert!(matches!(
            resolver.validate(&correction, &entry("that's wrong"), now()).unwrap(),
            Validation::Valid(Action::Correction)
        ));
    }

    #[test]
    fn low_confidence_never_resolves() {
        let (_dir, storage) = test_storage();
        let ids = SequentialIds::new();
        let resolver = Resolver::new(&storage, &ids);

        for confidence in [0.0, 0.1, 0.5, 0.69, 0.699_999] {
            let c = candidate(Intent::Log(TextFields::default()), confidence);
            let err = resolver.validate(&c, &entry("meh"), now()).unwrap_err();
            assert!(
                matches!(err, ResolveError::LowConfidence { .. }),
                "confidence {confidence}"
            );
        }
    }

    #[test]
    fn low_confidence_commitment_provisions_nothing() {
        let (_dir, storage) = test_storage();
        let ids = SequentialIds::new();
        let resolver = Resolver::new(&storage, &ids);

        let c = candidate(
            Intent::Commitment(crate::model::CommitmentFields {
                person: Some("bob".into()),
                ..Default::default()
            }),
            0.3,
        );
        assert!(resolver.validate(&c, &entry("maybe bob"), now()).is_err());
        assert!(storage.list_people().unwrap().is_empty());
    }

    #[test]
    fn uuid_ids_are_unique() {
        assert_ne!(UuidIds.next_id(), UuidIds.next_id());
    }
}
