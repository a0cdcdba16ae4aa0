//! Local persistence for daily records and entity tables.
//!
//! Everything lives under a single data directory:
//!
//! ```text
//! <root>/
//!   daily/YYYY-MM-DD.md      # Sectioned daily records (logs, commitments, notes)
//!   meta/people.json         # JSON array of people
//!   meta/projects.json       # JSON array of projects
//!   meta/commitments.json    # JSON array of commitments
//! ```
//!
//! Tables are loaded whole, scanned linearly, and rewritten whole on save.
//! There is no locking: concurrent invocations race, last writer wins.

mod commitments;
mod daily;
mod people;
mod projects;

use std::{fs, io, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

pub use daily::{Section, section_items};

const PEOPLE_FILE: &str = "people.json";
const PROJECTS_FILE: &str = "projects.json";
const COMMITMENTS_FILE: &str = "commitments.json";

const README: &str = "# Grechen Data Directory

## Structure

- `daily/` - Daily markdown files (YYYY-MM-DD.md)
  - Each file contains sections: ## logs, ## commitments, ## notes
  - Newest items sit directly under their section header

- `meta/` - Metadata storage (JSON files)
  - `people.json` - People you make commitments to
  - `projects.json` - Projects you work on
  - `commitments.json` - All commitments and their history

People and projects are created automatically the first time a
commitment or progress update mentions them. The JSON files can be
edited by hand.
";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based storage rooted at the data directory.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The `daily/` and `meta/` directories are created if they don't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let storage = Self { root };
        fs::create_dir_all(storage.daily_dir())?;
        fs::create_dir_all(storage.meta_dir())?;
        Ok(storage)
    }

    /// Returns the default data directory: `~/.grechen/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".grechen"))
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn daily_dir(&self) -> PathBuf {
        self.root.join("daily")
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join("meta")
    }

    /// Writes empty tables and the data directory README where missing.
    ///
    /// Returns the names of the files that were created. Existing files are
    /// left untouched.
    pub fn initialize(&self) -> Result<Vec<&'static str>> {
        fs::create_dir_all(self.daily_dir())?;
        fs::create_dir_all(self.meta_dir())?;

        let mut created = Vec::new();
        for name in [PEOPLE_FILE, PROJECTS_FILE, COMMITMENTS_FILE] {
            let path = self.meta_dir().join(name);
            if !path.exists() {
                fs::write(&path, "[]\n")?;
                created.push(name);
            }
        }

        let readme = self.root.join("README.md");
        if !readme.exists() {
            fs::write(&readme, README)?;
            created.push("README.md");
        }

        Ok(created)
    }

    /// Loads a whole JSON table. A missing or empty file is an empty table.
    fn load_table<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.meta_dir().join(name);
        let json = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    /// Rewrites a whole JSON table.
    fn save_table<T: Serialize>(&self, name: &str, rows: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(rows)?;
        fs::write(self.meta_dir().join(name), json)?;
        debug!(table = name, rows = rows.len(), "saved table");
        Ok(())
    }
}

/// Replaces the row whose key matches, or appends it.
fn upsert<T>(rows: &mut Vec<T>, row: T, key: impl Fn(&T) -> &str) {
    let id = key(&row).to_string();
    match rows.iter_mut().find(|r| key(r) == id) {
        Some(existing) => *existing = row,
        None => rows.push(row),
    }
}
