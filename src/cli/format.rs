//! Output formatting for CLI display.

use crate::model::{Deviation, Question};

/// Render a log item (`- 0930 coffee`) as `09:30 coffee`.
///
/// Items without a four-digit time prefix are shown as-is, minus the dash.
pub(super) fn format_log_item(item: &str) -> String {
    let text = item.strip_prefix("- ").unwrap_or(item);
    match text.get(..4) {
        Some(hhmm) if hhmm.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{}:{} {}", &hhmm[..2], &hhmm[2..], text[4..].trim())
        }
        _ => text.trim().to_string(),
    }
}

pub(super) fn priority_label(priority: i64) -> &'static str {
    match priority {
        p if p > 0 => "high",
        p if p < 0 => "low",
        _ => "normal",
    }
}

pub(super) fn format_deviation(deviation: &Deviation) -> String {
    format!(
        "[{}] {}: {}",
        deviation.severity, deviation.pattern, deviation.question.text
    )
}

/// The note recorded by `goodnight`: a header and the numbered questions.
pub(super) fn goodnight_note(questions: &[Question]) -> String {
    let mut note = String::from("goodnight questions:");
    for (i, q) in questions.iter().enumerate() {
        note.push_str(&format!("\n{}. {}", i + 1, q.text));
    }
    note
}

/// `in N days`, `today`, or `N days overdue`.
pub(super) fn format_days_left(days: i32) -> String {
    match days {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        d if d > 0 => format!("in {d} days"),
        -1 => "1 day overdue".to_string(),
        d => format!("{} days overdue", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{PatternType, Severity};

    #[test]
    fn log_item_time_gets_a_colon() {
        assert_eq!(format_log_item("- 0930 coffee"), "09:30 coffee");
        assert_eq!(format_log_item("- 1405   sync"), "14:05 sync");
    }

    #[test]
    fn log_item_without_time_is_kept() {
        assert_eq!(format_log_item("- lunch"), "lunch");
        assert_eq!(format_log_item("- 9am run"), "9am run");
    }

    #[test]
    fn priority_labels() {
        assert_eq!(priority_label(3), "high");
        assert_eq!(priority_label(0), "normal");
        assert_eq!(priority_label(-1), "low");
    }

    #[test]
    fn deviation_line() {
        let deviation = Deviation {
            pattern: PatternType::SparseLogs,
            severity: Severity::Low,
            question: Question::optional("sparse_logs", "quiet day?", "logs"),
        };
        assert_eq!(format_deviation(&deviation), "[low] sparse_logs: quiet day?");
    }

    #[test]
    fn goodnight_note_numbers_questions() {
        let questions = vec![
            Question::optional("a", "why late?", "work_start"),
            Question::optional("b", "still on track?", "commitment_update"),
        ];
        assert_eq!(
            goodnight_note(&questions),
            "goodnight questions:\n1. why late?\n2. still on track?"
        );
    }

    #[test]
    fn days_left() {
        assert_eq!(format_days_left(0), "today");
        assert_eq!(format_days_left(1), "in 1 day");
        assert_eq!(format_days_left(12), "in 12 days");
        assert_eq!(format_days_left(-3), "3 days overdue");
    }
}
