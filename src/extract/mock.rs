//! An offline extractor: canned responses plus keyword heuristics.

use std::collections::HashMap;

use jiff::Zoned;

use crate::model::{
    Candidate, CommitmentFields, ExpectationFields, Hardness, Intent, ProgressFields, TextFields,
};

use super::{ExtractError, Extraction, Extractor};

/// Projects the progress heuristic knows by name.
const KNOWN_PROJECTS: &[&str] = &["caresad", "farmer", "kaifu", "soldecoder"];

/// Extracts without a network call.
///
/// Canned responses (keyed by lower-cased input) win; otherwise commitment
/// words ("told", "promised", "will") suggest a commitment, completion words
/// ("done", "finished", "completed") a progress entry, and anything else is
/// a log.
#[derive(Debug, Default)]
pub struct MockExtractor {
    responses: HashMap<String, Extraction>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `input` (case-insensitively) with `extraction` from now on.
    #[cfg(test)]
    pub fn set_response(&mut self, input: &str, extraction: Extraction) {
        self.responses.insert(input.to_lowercase(), extraction);
    }
}

impl Extractor for MockExtractor {
    fn extract(&self, input: &str, now: &Zoned) -> Result<Extraction, ExtractError> {
        let lower = input.to_lowercase();
        if let Some(canned) = self.responses.get(&lower) {
            return Ok(canned.clone());
        }

        if ["told", "promised", "will"].iter().any(|w| lower.contains(w)) {
            let person = lower.contains("prof").then(|| "prof".to_string());
            let expectation = if lower.contains("tomorrow") {
                now.date().tomorrow().ok().map(|due| ExpectationFields {
                    description: Some(last_words(input, 3)),
                    deadline: Some(due.to_string()),
                    hardness: Some(Hardness::Hard),
                })
            } else {
                None
            };

            if person.is_some() || expectation.is_some() {
                return Ok(candidate(
                    Intent::Commitment(CommitmentFields {
                        person,
                        project: None,
                        expectation,
                    }),
                    0.85,
                ));
            }
        }

        if ["done", "finished", "completed"].iter().any(|w| lower.contains(w)) {
            let project = KNOWN_PROJECTS
                .iter()
                .copied()
                .find(|p| lower.contains(p))
                .unwrap_or("unknown");
            return Ok(candidate(
                Intent::Progress(ProgressFields {
                    project: Some(project.to_string()),
                    ..ProgressFields::default()
                }),
                0.80,
            ));
        }

        Ok(candidate(
            Intent::Log(TextFields {
                text: Some(input.to_string()),
            }),
            0.90,
        ))
    }
}

fn candidate(intent: Intent, confidence: f64) -> Extraction {
    Extraction {
        candidate: Candidate {
            intent,
            confidence,
            questions: Vec::new(),
        },
        questions: Vec::new(),
    }
}

/// The last `n` words, or the whole input if it has no more than `n`.
fn last_words(input: &str, n: usize) -> String {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.len() > n {
        words[words.len() - n..].join(" ")
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::{civil::date, tz::TimeZone};

    use crate::model::{IntentType, Question};

    fn now() -> Zoned {
        date(2024, 3, 8)
            .at(10, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
    }

    #[test]
    fn promise_to_prof_due_tomorrow() {
        let extraction = MockExtractor::new()
            .extract("told prof the pr will be ready tomorrow", &now())
            .unwrap();

        let Intent::Commitment(fields) = extraction.candidate.intent else {
            panic!("expected commitment");
        };
        assert_eq!(fields.person.as_deref(), Some("prof"));
        let expectation = fields.expectation.unwrap();
        assert_eq!(expectation.deadline.as_deref(), Some("2024-03-09"));
        assert_eq!(expectation.description.as_deref(), Some("be ready tomorrow"));
        assert_eq!(expectation.hardness, Some(Hardness::Hard));
    }

    #[test]
    fn commitment_word_without_details_falls_through() {
        let extraction = MockExtractor::new()
            .extract("i will think about it", &now())
            .unwrap();
        assert_eq!(extraction.candidate.intent.kind(), IntentType::Log);
    }

    #[test]
    fn completion_names_known_project() {
        let extraction = MockExtractor::new()
            .extract("finished the Kaifu release", &now())
            .unwrap();
        let Intent::Progress(fields) = extraction.candidate.intent else {
            panic!("expected progress");
        };
        assert_eq!(fields.project.as_deref(), Some("kaifu"));

        let extraction = MockExtractor::new().extract("done for now", &now()).unwrap();
        let Intent::Progress(fields) = extraction.candidate.intent else {
            panic!("expected progress");
        };
        assert_eq!(fields.project.as_deref(), Some("unknown"));
    }

    #[test]
    fn plain_text_is_a_log() {
        let extraction = MockExtractor::new().extract("coffee", &now()).unwrap();
        assert_eq!(extraction.candidate.intent.kind(), IntentType::Log);
        assert!((extraction.candidate.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn canned_response_matches_case_insensitively() {
        let mut mock = MockExtractor::new();
        let mut canned = candidate(Intent::Correction(TextFields::default()), 1.0);
        canned.questions.push(Question::required("q", "really?", "text"));
        mock.set_response("That's Wrong", canned);

        let extraction = mock.extract("that's wrong", &now()).unwrap();
        assert_eq!(extraction.candidate.intent.kind(), IntentType::Correction);
        assert_eq!(extraction.questions.len(), 1);
    }
}
