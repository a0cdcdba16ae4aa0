//! Daily record storage: sectioned markdown files, one per calendar day.
//!
//! A day file holds `## logs`, `## commitments`, and `## notes` sections,
//! each created on first use. Every append inserts its line directly under
//! the section header (after the blank line that follows it), so items
//! within a section read newest-first.
//!
//! Appends are whole-file read-modify-write and not atomic: a crash
//! mid-write can leave a malformed day file.

use std::{fs, io, path::PathBuf};

use jiff::civil::Date;
use tracing::debug;

use crate::model::{Commitment, Entry};

use super::{Result, Storage};

/// A named section within a day file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Logs,
    Commitments,
    Notes,
}

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Self::Logs => "logs",
            Self::Commitments => "commitments",
            Self::Notes => "notes",
        }
    }

    /// The markdown header line that opens this section.
    pub fn header(self) -> &'static str {
        match self {
            Self::Logs => "## logs",
            Self::Commitments => "## commitments",
            Self::Notes => "## notes",
        }
    }
}

impl Storage {
    /// Records an entry in the day's logs as `- HHMM <raw>`.
    pub fn append_log(&self, date: Date, entry: &Entry) -> Result<()> {
        self.append_to_section(date, Section::Logs, &format_log_line(entry))
    }

    /// Records a commitment (new or updated) in the day's commitments.
    pub fn append_commitment(&self, date: Date, commitment: &Commitment) -> Result<()> {
        self.append_to_section(date, Section::Commitments, &format_commitment_line(commitment))
    }

    /// Records free text in the day's notes, verbatim.
    pub fn append_note(&self, date: Date, text: &str) -> Result<()> {
        self.append_to_section(date, Section::Notes, text)
    }

    /// Reads a day's raw text. A day with no file reads as empty.
    pub fn read_daily(&self, date: Date) -> Result<String> {
        match fs::read_to_string(self.daily_path(date)) {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the non-blank lines of one section of a day, in file order.
    pub fn read_section(&self, date: Date, section: Section) -> Result<Vec<String>> {
        let content = self.read_daily(date)?;
        Ok(section_lines(&content, section)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn daily_path(&self, date: Date) -> PathBuf {
        self.daily_dir().join(format!("{date}.md"))
    }

    fn append_to_section(&self, date: Date, section: Section, line: &str) -> Result<()> {
        let path = self.daily_path(date);
        let mut lines: Vec<String> = match fs::read_to_string(&path) {
            Ok(s) => s.split('\n').map(String::from).collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let header = section.header();
        let header_index = match lines.iter().position(|l| l.trim() == header) {
            Some(i) => i,
            None => {
                if lines.last().is_some_and(|l| !l.is_empty()) {
                    lines.push(String::new());
                }
                lines.push(header.to_string());
                lines.push(String::new());
                lines.len() - 1
            }
        };

        // Skip the blank line under the header.
        let mut insert_at = header_index + 1;
        if lines.get(insert_at).is_some_and(|l| l.trim().is_empty()) {
            insert_at += 1;
        }
        lines.insert(insert_at, line.to_string());

        fs::write(&path, lines.join("\n"))?;
        debug!(%date, section = section.name(), "appended to day file");
        Ok(())
    }
}

/// Trimmed lines belonging to `section`, in file order.
///
/// A section runs from its header to the next `## ` header.
fn section_lines(content: &str, section: Section) -> impl Iterator<Item = &str> {
    let header = section.header();
    let mut inside = false;
    content.split('\n').filter_map(move |line| {
        let trimmed = line.trim();
        if trimmed == header {
            inside = true;
            return None;
        }
        if trimmed.starts_with("## ") {
            inside = false;
            return None;
        }
        inside.then_some(trimmed)
    })
}

/// Section lines that are list items (`- ...`).
pub fn section_items(content: &str, section: Section) -> impl Iterator<Item = &str> {
    section_lines(content, section).filter(|l| l.starts_with("- "))
}

fn format_log_line(entry: &Entry) -> String {
    format!("- {} {}", entry.timestamp.strftime("%H%M"), entry.raw)
}

fn format_commitment_line(commitment: &Commitment) -> String {
    format!(
        "- {} → {} (due {})",
        commitment.person_id, commitment.expectation.description, commitment.expectation.deadline
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::{Timestamp, civil::date, tz::TimeZone};
    use tempfile::TempDir;

    use crate::model::*;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        (dir, storage)
    }

    fn entry_at(hour: i8, minute: i8, raw: &str) -> Entry {
        Entry {
            id: format!("e-{raw}"),
            timestamp: date(2024, 3, 1)
                .at(hour, minute, 0, 0)
                .to_zoned(TimeZone::UTC)
                .unwrap(),
            raw: raw.into(),
        }
    }

    fn sample_commitment() -> Commitment {
        Commitment {
            id: "c1".into(),
            created_at: Timestamp::new(1_700_000_000, 0).unwrap(),
            source_entry_id: "e1".into(),
            person_id: "bob".into(),
            project_id: None,
            expectation: Expectation {
                description: "design doc ready".into(),
                deadline: date(2030, 1, 1),
                hardness: Hardness::Soft,
            },
            status: CommitmentStatus::Open,
            last_update_at: None,
            history: vec![],
        }
    }

    #[test]
    fn log_round_trips_verbatim() {
        let (_dir, storage) = test_storage();
        let day = date(2024, 3, 1);
        storage
            .append_log(day, &entry_at(8, 30, "sitting down to work on kaifu"))
            .unwrap();

        let logs = storage.read_section(day, Section::Logs).unwrap();
        assert_eq!(logs, vec!["- 0830 sitting down to work on kaifu"]);
    }

    #[test]
    fn newest_item_sits_under_header() {
        let (_dir, storage) = test_storage();
        let day = date(2024, 3, 1);
        storage.append_log(day, &entry_at(8, 0, "first")).unwrap();
        storage.append_log(day, &entry_at(9, 0, "second")).unwrap();

        let content = storage.read_daily(day).unwrap();
        assert_eq!(content, "## logs\n\n- 0900 second\n- 0800 first");
    }

    #[test]
    fn new_sections_append_after_existing_content() {
        let (_dir, storage) = test_storage();
        let day = date(2024, 3, 1);
        storage.append_log(day, &entry_at(8, 0, "coffee")).unwrap();
        storage
            .append_commitment(day, &sample_commitment())
            .unwrap();
        storage.append_note(day, "correction: wrong day").unwrap();
        storage.append_log(day, &entry_at(10, 15, "lunch")).unwrap();

        let content = storage.read_daily(day).unwrap();
        assert_eq!(
            content,
            "## logs\n\n- 1015 lunch\n- 0800 coffee\n\n\
             ## commitments\n\n- bob → design doc ready (due 2030-01-01)\n\n\
             ## notes\n\ncorrection: wrong day"
        );
        assert_eq!(
            storage.read_section(day, Section::Commitments).unwrap(),
            vec!["- bob → design doc ready (due 2030-01-01)"]
        );
    }

    #[test]
    fn missing_day_reads_empty() {
        let (_dir, storage) = test_storage();
        let day = date(2024, 3, 1);

        assert_eq!(storage.read_daily(day).unwrap(), "");
        assert!(storage.read_section(day, Section::Logs).unwrap().is_empty());
    }

    #[test]
    fn section_items_stop_at_next_header() {
        let content = "## logs\n\n- 0900 a\nstray\n## notes\n\n- not a log";
        let items: Vec<&str> = section_items(content, Section::Logs).collect();
        assert_eq!(items, vec!["- 0900 a"]);
    }
}
