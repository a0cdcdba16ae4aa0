//! Commitment storage: the `commitments.json` table.

use jiff::{Timestamp, civil::Date};

use crate::model::Commitment;

use super::{COMMITMENTS_FILE, Result, Storage, StorageError, upsert};

impl Storage {
    /// Saves a commitment, replacing any existing row with the same id.
    pub fn save_commitment(&self, commitment: &Commitment) -> Result<()> {
        let mut commitments = self.list_commitments()?;
        upsert(&mut commitments, commitment.clone(), |c| c.id.as_str());
        self.save_table(COMMITMENTS_FILE, &commitments)
    }

    pub fn get_commitment(&self, id: &str) -> Result<Commitment> {
        self.list_commitments()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StorageError::NotFound {
                kind: "commitment",
                id: id.to_string(),
            })
    }

    /// All commitments, in table order.
    pub fn list_commitments(&self) -> Result<Vec<Commitment>> {
        self.load_table(COMMITMENTS_FILE)
    }

    /// Commitments whose status is `open` or `updated`.
    pub fn list_open_commitments(&self) -> Result<Vec<Commitment>> {
        self.list_commitments_where(Commitment::is_open)
    }

    pub fn list_commitments_by_person(&self, person_id: &str) -> Result<Vec<Commitment>> {
        self.list_commitments_where(|c| c.person_id == person_id)
    }

    pub fn list_commitments_by_project(&self, project_id: &str) -> Result<Vec<Commitment>> {
        self.list_commitments_where(|c| c.project_id.as_deref() == Some(project_id))
    }

    /// Open commitments due strictly before `date`.
    pub fn list_commitments_due_before(&self, date: Date) -> Result<Vec<Commitment>> {
        self.list_commitments_where(|c| c.is_open() && c.expectation.deadline < date)
    }

    /// Open commitments created strictly before `cutoff`: the carried-over todos.
    pub fn list_open_commitments_created_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<Commitment>> {
        self.list_commitments_where(|c| c.is_open() && c.created_at < cutoff)
    }

    fn list_commitments_where(
        &self,
        keep: impl Fn(&Commitment) -> bool,
    ) -> Result<Vec<Commitment>> {
        let mut commitments = self.list_commitments()?;
        commitments.retain(|c| keep(c));
        Ok(commitments)
    }
}
