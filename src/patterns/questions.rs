//! Question ranking: the few questions worth asking, most urgent first.

use std::collections::HashSet;

use crate::model::{Deviation, Question, Severity};

/// Cap used when the caller asks for zero questions.
pub const DEFAULT_MAX_QUESTIONS: usize = 5;

/// Picks at most `max` questions from `deviations`.
///
/// High severity goes first, then medium, then low; within a severity the
/// input order holds. The first question seen for an id wins. A `max` of
/// zero means [`DEFAULT_MAX_QUESTIONS`].
pub fn rank_questions(deviations: &[Deviation], max: usize) -> Vec<Question> {
    let max = if max == 0 { DEFAULT_MAX_QUESTIONS } else { max };

    let mut seen = HashSet::new();
    let mut ranked = Vec::new();
    for severity in [Severity::High, Severity::Medium, Severity::Low] {
        for deviation in deviations.iter().filter(|d| d.severity == severity) {
            if ranked.len() >= max {
                return ranked;
            }
            if seen.insert(deviation.question.id.as_str()) {
                ranked.push(deviation.question.clone());
            }
        }
    }
    ranked
}
