//! Resolving new commitments.

use jiff::{Timestamp, civil::Date};

use crate::model::{
    Action, Commitment, CommitmentFields, CommitmentStatus, Entry, Expectation, Question,
};

use super::{ResolveError, Resolver, Result, Validation, non_empty};

impl Resolver<'_> {
    /// Needs a person, a description and a deadline.
    ///
    /// The person, and the project if one is named, are provisioned before
    /// the other fields are checked.
    pub(super) fn validate_commitment(
        &self,
        fields: &CommitmentFields,
        entry: &Entry,
        now: Timestamp,
    ) -> Result<Validation> {
        let mut questions = Vec::new();

        let person = non_empty(fields.person.as_ref());
        match person {
            Some(id) => {
                self.storage.ensure_person(id)?;
            }
            None => questions.push(Question::required(
                "person",
                "who is this commitment to?",
                "person",
            )),
        }

        let (description, deadline) = match &fields.expectation {
            Some(expectation) => {
                let description = non_empty(expectation.description.as_ref());
                if description.is_none() {
                    questions.push(Question::required(
                        "expectation_description",
                        "what exactly is the commitment?",
                        "expectation.description",
                    ));
                }
                let deadline = non_empty(expectation.deadline.as_ref());
                if deadline.is_none() {
                    questions.push(Question::required(
                        "expectation_deadline",
                        "when is this due?",
                        "expectation.deadline",
                    ));
                }
                (description, deadline)
            }
            None => {
                questions.push(Question::required(
                    "expectation",
                    "what is the commitment?",
                    "expectation",
                ));
                (None, None)
            }
        };

        let project = non_empty(fields.project.as_ref());
        if let Some(id) = project {
            self.storage.ensure_project(id)?;
        }

        let (Some(person_id), Some(description), Some(deadline)) = (person, description, deadline)
        else {
            return Ok(Validation::Invalid(questions));
        };

        let deadline =
            Date::strptime("%Y-%m-%d", deadline).map_err(|source| ResolveError::InvalidDeadline {
                value: deadline.to_string(),
                source,
            })?;
        let hardness = fields
            .expectation
            .as_ref()
            .and_then(|e| e.hardness)
            .unwrap_or_default();

        Ok(Validation::Valid(Action::Commitment(Commitment {
            id: self.ids.next_id(),
            created_at: now,
            source_entry_id: entry.id.clone(),
            person_id: person_id.to_string(),
            project_id: project.map(String::from),
            expectation: Expectation {
                description: description.to_string(),
                deadline,
                hardness,
            },
            status: CommitmentStatus::Open,
            last_update_at: None,
            history: Vec::new(),
        })))
    }
}
