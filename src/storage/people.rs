//! People storage: the `people.json` table.

use tracing::info;

use crate::model::Person;

use super::{PEOPLE_FILE, Result, Storage, StorageError, upsert};

impl Storage {
    /// Saves a person, replacing any existing row with the same id.
    pub fn save_person(&self, person: &Person) -> Result<()> {
        let mut people = self.list_people()?;
        upsert(&mut people, person.clone(), |p| p.id.as_str());
        self.save_table(PEOPLE_FILE, &people)
    }

    /// Loads a person by exact id.
    pub fn get_person(&self, id: &str) -> Result<Person> {
        self.list_people()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StorageError::NotFound {
                kind: "person",
                id: id.to_string(),
            })
    }

    pub fn list_people(&self) -> Result<Vec<Person>> {
        self.load_table(PEOPLE_FILE)
    }

    /// Finds a person by name or id, ignoring case.
    pub fn find_person_by_name(&self, name: &str) -> Result<Person> {
        let needle = name.to_lowercase();
        self.list_people()?
            .into_iter()
            .find(|p| p.name.to_lowercase() == needle || p.id.to_lowercase() == needle)
            .ok_or_else(|| StorageError::NotFound {
                kind: "person",
                id: name.to_string(),
            })
    }

    /// Get-or-create: returns the person with `id`, creating a placeholder
    /// named after the id if none exists.
    ///
    /// Idempotent. Returns `true` in the second position when a row was created.
    pub fn ensure_person(&self, id: &str) -> Result<(Person, bool)> {
        match self.get_person(id) {
            Ok(person) => Ok((person, false)),
            Err(StorageError::NotFound { .. }) => {
                let person = Person::placeholder(id);
                self.save_person(&person)?;
                info!(person = id, "created placeholder person");
                Ok((person, true))
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
    fn save_and_get_person() {
        let (_dir, storage) = test_storage();
        storage.save_person(&Person::placeholder("bob")).unwrap();

        let loaded = storage.get_person("bob").unwrap();
        assert_eq!(loaded.name, "bob");
    }

    #[test]
    fn save_person_updates_in_place() {
        let (_dir, storage) = test_storage();
        storage.save_person(&Person::placeholder("bob")).unwrap();

        let mut bob = storage.get_person("bob").unwrap();
        bob.name = "Bob Smith".into();
        storage.save_person(&bob).unwrap();

        let people = storage.list_people().unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].name, "Bob Smith");
    }

    #[test]
    fn get_person_is_case_sensitive() {
        let (_dir, storage) = test_storage();
        storage.save_person(&Person::placeholder("bob")).unwrap();

        let err = storage.get_person("Bob").unwrap_err();
        assert!(matches!(err, StorageError::NotFound { kind: "person", .. }));
    }

    #[test]
    fn find_person_by_name_ignores_case() {
        let (_dir, storage) = test_storage();
        let mut alice = Person::placeholder("a1");
        alice.name = "Alice".into();
        storage.save_person(&alice).unwrap();

        assert_eq!(storage.find_person_by_name("ALICE").unwrap().id, "a1");
        assert_eq!(storage.find_person_by_name("A1").unwrap().id, "a1");
        assert!(storage.find_person_by_name("carol").is_err());
    }

    #[test]
    fn ensure_person_creates_once() {
        let (_dir, storage) = test_storage();

        let (_, created) = storage.ensure_person("bob").unwrap();
        assert!(created);
        let (person, created) = storage.ensure_person("bob").unwrap();
        assert!(!created);
        assert_eq!(person.id, "bob");

        assert_eq!(storage.list_people().unwrap().len(), 1);
    }
}
