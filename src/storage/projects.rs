//! Project storage: the `projects.json` table.

use tracing::info;

use crate::model::Project;

use super::{PROJECTS_FILE, Result, Storage, StorageError, upsert};

impl Storage {
    /// Saves a project, replacing any existing row with the same id.
    pub fn save_project(&self, project: &Project) -> Result<()> {
        let mut projects = self.list_projects()?;
        upsert(&mut projects, project.clone(), |p| p.id.as_str());
        self.save_table(PROJECTS_FILE, &projects)
    }

    pub fn get_project(&self, id: &str) -> Result<Project> {
        self.list_projects()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StorageError::NotFound {
                kind: "project",
                id: id.to_string(),
            })
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.load_table(PROJECTS_FILE)
    }

    /// Get-or-create, as [`Storage::ensure_person`] but for projects.
    pub fn ensure_project(&self, id: &str) -> Result<(Project, bool)> {
        match self.get_project(id) {
            Ok(project) => Ok((project, false)),
            Err(StorageError::NotFound { .. }) => {
                let project = Project::placeholder(id);
                self.save_project(&project)?;
                info!(project = id, "created placeholder project");
                Ok((project, true))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        (dir, storage)
    }

    #[test]
    fn list_projects_empty_without_file() {
        let (_dir, storage) = test_storage();
        assert!(storage.list_projects().unwrap().is_empty());
    }

    #[test]
    fn save_project_updates_priority() {
        let (_dir, storage) = test_storage();
        storage.save_project(&Project::placeholder("kaifu")).unwrap();

        let mut project = storage.get_project("kaifu").unwrap();
        project.priority = 1;
        storage.save_project(&project).unwrap();

        let projects = storage.list_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].priority, 1);
    }

    #[test]
    fn ensure_project_is_idempotent() {
        let (_dir, storage) = test_storage();

        assert!(storage.ensure_project("farmer").unwrap().1);
        assert!(!storage.ensure_project("farmer").unwrap().1);
        assert_eq!(storage.list_projects().unwrap().len(), 1);
    }
}
