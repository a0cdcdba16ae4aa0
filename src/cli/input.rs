//! Free-text input: extract, resolve, apply.

use jiff::Zoned;

use crate::{
    execute,
    extract::Extractor,
    model::{Candidate, Entry, Intent, Question, TextFields},
    resolve::{IdGenerator, Resolver, UuidIds, Validation},
    storage::Storage,
};

pub(super) fn cmd_input(storage: &Storage, extractor: &dyn Extractor, text: &str) -> Result<(), String> {
    let now = Zoned::now();
    let entry = new_entry(text, &now);

    eprintln!("processing...");
    let extraction = extractor
        .extract(text, &now)
        .map_err(|e| format!("extraction failed: {e}"))?;

    if !extraction.questions.is_empty() {
        return ask(&extraction.questions);
    }
    process(storage, &extraction.candidate, &entry, &now)
}

/// Record a correction without going through extraction.
pub(super) fn cmd_thats_wrong(storage: &Storage, text: &str) -> Result<(), String> {
    let now = Zoned::now();
    let entry = new_entry(text, &now);
    let candidate = Candidate {
        intent: Intent::Correction(TextFields {
            text: Some(text.to_string()),
        }),
        confidence: 1.0,
        questions: Vec::new(),
    };
    process(storage, &candidate, &entry, &now)
}

fn new_entry(text: &str, now: &Zoned) -> Entry {
    Entry {
        id: UuidIds.next_id(),
        timestamp: now.clone(),
        raw: text.to_string(),
    }
}

fn process(storage: &Storage, candidate: &Candidate, entry: &Entry, now: &Zoned) -> Result<(), String> {
    let ids = UuidIds;
    let validation = Resolver::new(storage, &ids)
        .validate(candidate, entry, now.timestamp())
        .map_err(|e| format!("could not resolve input: {e}"))?;

    match validation {
        Validation::Valid(action) => {
            let summary = execute::apply(storage, &action, entry, now.date(), now.timestamp())
                .map_err(|e| format!("failed to record {}: {e}", candidate.intent.kind()))?;
            println!("{summary} (confidence: {:.2})", candidate.confidence);
            Ok(())
        }
        Validation::Invalid(questions) => ask(&questions),
    }
}

/// Print the questions and refuse to go further.
fn ask(questions: &[Question]) -> Result<(), String> {
    for q in questions {
        println!("? {}", q.text);
    }
    Err("questions need answers".to_string())
}
