//! Resolving updates, progress and events.

use jiff::civil::{Date, DateTime};

use crate::{
    model::{
        Action, CommitmentStatus, CommitmentUpdate, Event, EventFields, Progress, ProgressFields,
        Question, UpdateFields,
    },
    storage::StorageError,
};

use super::{ResolveError, Resolver, Result, Validation, non_empty};

/// Status words that mean the commitment is done.
const FULFILLED_WORDS: &[&str] = &["done", "completed", "finished"];

impl Resolver<'_> {
    /// Finds the commitment an update refers to.
    ///
    /// An explicit id wins, even if it matches nothing (that becomes a
    /// question, not an error). Otherwise the person, then the project,
    /// must narrow the open commitments down to exactly one.
    pub(super) fn validate_update(&self, fields: &UpdateFields) -> Result<Validation> {
        let commitment_id = match non_empty(fields.commitment_id.as_ref()) {
            Some(id) => match self.storage.get_commitment(id) {
                Ok(commitment) => commitment.id,
                Err(StorageError::NotFound { .. }) => {
                    return Ok(ask(
                        "commitment_id",
                        format!("commitment {id} not found. which commitment?"),
                    ));
                }
                Err(e) => return Err(e.into()),
            },
            None => {
                let person = non_empty(fields.person.as_ref());
                let project = non_empty(fields.project.as_ref());
                let candidates = match (person, project) {
                    (Some(person), _) => self.storage.list_commitments_by_person(person)?,
                    (None, Some(project)) => self.storage.list_commitments_by_project(project)?,
                    (None, None) => {
                        return Ok(ask(
                            "commitment_identifier",
                            "which commitment is this updating?",
                        ));
                    }
                };

                let mut open: Vec<_> = candidates.into_iter().filter(|c| c.is_open()).collect();
                match open.len() {
                    0 => {
                        return Ok(ask(
                            "commitment_not_found",
                            "no open commitments found. which commitment?",
                        ));
                    }
                    1 => open.remove(0).id,
                    n => {
                        return Ok(ask(
                            "commitment_ambiguous",
                            format!("multiple commitments found ({n}). which one?"),
                        ));
                    }
                }
            }
        };

        let description = fields.status.clone().unwrap_or_default();
        let new_status = if FULFILLED_WORDS.contains(&description.as_str()) {
            CommitmentStatus::Fulfilled
        } else {
            CommitmentStatus::Updated
        };

        Ok(Validation::Valid(Action::Update(CommitmentUpdate {
            commitment_id,
            new_status,
            description,
        })))
    }

    /// Needs a project, which is provisioned if new.
    pub(super) fn validate_progress(&self, fields: &ProgressFields) -> Result<Validation> {
        let Some(project_id) = non_empty(fields.project.as_ref()) else {
            return Ok(Validation::Invalid(vec![Question::required(
                "project",
                "which project is this progress for?",
                "project",
            )]));
        };
        self.storage.ensure_project(project_id)?;

        Ok(Validation::Valid(Action::Progress(Progress {
            project_id: project_id.to_string(),
            status: fields.status.clone().unwrap_or_default(),
            notes: fields.notes.clone().unwrap_or_default(),
        })))
    }
}

/// Needs a time. A missing time is a question; an unparseable one is an error.
pub(super) fn validate_event(fields: &EventFields) -> Result<Validation> {
    let Some(time) = non_empty(fields.time.as_ref()) else {
        return Ok(Validation::Invalid(vec![Question::required(
            "time",
            "when is this event?",
            "time",
        )]));
    };

    Ok(Validation::Valid(Action::Event(Event {
        time: parse_event_time(time)?,
        person_id: non_empty(fields.person.as_ref()).map(String::from),
        project_id: non_empty(fields.project.as_ref()).map(String::from),
        title: fields.title.clone().unwrap_or_default(),
    })))
}

/// `YYYY-MM-DD HH:MM`, or `YYYY-MM-DD` at midnight.
fn parse_event_time(s: &str) -> Result<DateTime> {
    DateTime::strptime("%Y-%m-%d %H:%M", s)
        .or_else(|_| Date::strptime("%Y-%m-%d", s).map(|d| d.at(0, 0, 0, 0)))
        .map_err(|_| ResolveError::InvalidEventTime {
            value: s.to_string(),
        })
}

fn ask(id: &str, text: impl Into<String>) -> Validation {
    Validation::Invalid(vec![Question::required(id, text, "commitment_id")])
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};

    use crate::model::{
        Action, Commitment, CommitmentStatus, EventFields, Expectation, Hardness, Intent,
        ProgressFields, UpdateFields,
    };
    use crate::resolve::tests::{SequentialIds, candidate, entry, now, test_storage};
    use crate::resolve::{ResolveError, Resolver, Validation};
    use crate::storage::Storage;

    fn save(storage: &Storage, id: &str, person: &str, project: Option<&str>, status: CommitmentStatus) {
        storage
            .save_commitment(&Commitment {
                id: id.into(),
                created_at: Timestamp::new(1_700_000_000, 0).unwrap(),
                source_entry_id: "e0".into(),
                person_id: person.into(),
                project_id: project.map(String::from),
                expectation: Expectation {
                    description: "design doc ready".into(),
                    deadline: date(2030, 1, 1),
                    hardness: Hardness::Soft,
                },
                status,
                last_update_at: None,
                history: vec![],
            })
            .unwrap();
    }

    fn update(commitment_id: Option<&str>, person: Option<&str>, status: Option<&str>) -> Intent {
        Intent::Update(UpdateFields {
            commitment_id: commitment_id.map(String::from),
            person: person.map(String::from),
            project: None,
            status: status.map(String::from),
        })
    }

    fn resolve(storage: &Storage, intent: Intent) -> Validation {
        let ids = SequentialIds::new();
        Resolver::new(storage, &ids)
            .validate(&candidate(intent, 0.9), &entry("x"), now())
            .unwrap()
    }

    fn questions(validation: Validation) -> Vec<crate::model::Question> {
        match validation {
            Validation::Invalid(qs) => qs,
            Validation::Valid(action) => panic!("expected questions, got {action:?}"),
        }
    }

    #[test]
    fn unknown_commitment_id_asks_once() {
        let (_dir, storage) = test_storage();
        save(&storage, "c1", "bob", None, CommitmentStatus::Open);
        let before = std::fs::read_to_string(storage.meta_dir().join("commitments.json")).unwrap();

        let qs = questions(resolve(&storage, update(Some("c404"), None, Some("done"))));

        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].id, "commitment_id");
        assert!(qs[0].required);
        assert!(qs[0].text.contains("c404"));
        let after = std::fs::read_to_string(storage.meta_dir().join("commitments.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn two_open_commitments_for_person_are_ambiguous() {
        let (_dir, storage) = test_storage();
        save(&storage, "c1", "bob", None, CommitmentStatus::Open);
        save(&storage, "c2", "bob", None, CommitmentStatus::Updated);
        save(&storage, "c3", "bob", None, CommitmentStatus::Fulfilled);

        let qs = questions(resolve(&storage, update(None, Some("bob"), Some("halfway"))));

        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].id, "commitment_ambiguous");
        assert!(qs[0].text.contains('2'));
    }

    #[test]
    fn single_open_commitment_resolves() {
        let (_dir, storage) = test_storage();
        save(&storage, "c1", "bob", None, CommitmentStatus::Open);
        save(&storage, "c2", "bob", None, CommitmentStatus::Violated);

        let Validation::Valid(Action::Update(u)) =
            resolve(&storage, update(None, Some("bob"), Some("finished")))
        else {
            panic!("expected an update");
        };
        assert_eq!(u.commitment_id, "c1");
        assert_eq!(u.new_status, CommitmentStatus::Fulfilled);
        assert_eq!(u.description, "finished");
    }

    #[test]
    fn other_status_text_is_an_update() {
        let (_dir, storage) = test_storage();
        save(&storage, "c1", "bob", None, CommitmentStatus::Open);

        let Validation::Valid(Action::Update(u)) =
            resolve(&storage, update(Some("c1"), None, Some("halfway there")))
        else {
            panic!("expected an update");
        };
        assert_eq!(u.new_status, CommitmentStatus::Updated);
    }

    #[test]
    fn explicit_id_may_name_a_closed_commitment() {
        let (_dir, storage) = test_storage();
        save(&storage, "c1", "bob", None, CommitmentStatus::Fulfilled);

        let validation = resolve(&storage, update(Some("c1"), None, Some("reopened")));
        assert!(matches!(validation, Validation::Valid(Action::Update(_))));
    }

    #[test]
    fn lookup_by_project_and_no_match() {
        let (_dir, storage) = test_storage();
        save(&storage, "c1", "bob", Some("kaifu"), CommitmentStatus::Open);

        let intent = Intent::Update(UpdateFields {
            project: Some("kaifu".into()),
            ..UpdateFields::default()
        });
        let Validation::Valid(Action::Update(u)) = resolve(&storage, intent) else {
            panic!("expected an update");
        };
        assert_eq!(u.commitment_id, "c1");

        let qs = questions(resolve(&storage, update(None, Some("dana"), None)));
        assert_eq!(qs[0].id, "commitment_not_found");

        let qs = questions(resolve(&storage, update(None, None, Some("done"))));
        assert_eq!(qs[0].id, "commitment_identifier");
    }

    #[test]
    fn progress_needs_project_and_provisions_it() {
        let (_dir, storage) = test_storage();

        let qs = questions(resolve(&storage, Intent::Progress(ProgressFields::default())));
        assert_eq!(qs[0].id, "project");

        let intent = Intent::Progress(ProgressFields {
            project: Some("farmer".into()),
            status: Some("shipped".into()),
            notes: None,
        });
        let Validation::Valid(Action::Progress(p)) = resolve(&storage, intent) else {
            panic!("expected progress");
        };
        assert_eq!(p.project_id, "farmer");
        assert_eq!(p.status, "shipped");
        assert_eq!(p.notes, "");
        assert_eq!(storage.get_project("farmer").unwrap().priority, 0);
    }

    #[test]
    fn event_time_formats() {
        let (_dir, storage) = test_storage();

        let event = |time: &str| {
            Intent::Event(EventFields {
                time: Some(time.into()),
                title: Some("sync".into()),
                ..EventFields::default()
            })
        };

        let Validation::Valid(Action::Event(e)) = resolve(&storage, event("2024-03-09 14:30"))
        else {
            panic!("expected event");
        };
        assert_eq!(e.time, date(2024, 3, 9).at(14, 30, 0, 0));
        assert_eq!(e.title, "sync");

        let Validation::Valid(Action::Event(e)) = resolve(&storage, event("2024-03-09")) else {
            panic!("expected event");
        };
        assert_eq!(e.time, date(2024, 3, 9).at(0, 0, 0, 0));
    }

    #[test]
    fn missing_event_time_asks_but_bad_time_fails() {
        let (_dir, storage) = test_storage();

        let qs = questions(resolve(&storage, Intent::Event(EventFields::default())));
        assert_eq!(qs[0].id, "time");

        let ids = SequentialIds::new();
        let intent = Intent::Event(EventFields {
            time: Some("tomorrow at noon".into()),
            ..EventFields::default()
        });
        let err = Resolver::new(&storage, &ids)
            .validate(&candidate(intent, 0.9), &entry("x"), now())
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidEventTime { .. }));
    }
}
