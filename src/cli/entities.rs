//! Record commands: commitments, people, projects, mark.

use jiff::Zoned;

use crate::{execute, model::CommitmentStatus, storage::Storage};

use super::format::priority_label;

pub(super) fn cmd_commitments(storage: &Storage) -> Result<(), String> {
    let commitments = storage
        .list_commitments()
        .map_err(|e| format!("failed to list commitments: {e}"))?;

    if commitments.is_empty() {
        println!("no commitments");
        return Ok(());
    }

    println!("commitments:");
    for c in &commitments {
        println!(
            "  [{}] {} → {} (due {}, status: {})",
            c.id, c.person_id, c.expectation.description, c.expectation.deadline, c.status
        );
    }
    Ok(())
}

pub(super) fn cmd_people(storage: &Storage) -> Result<(), String> {
    let people = storage
        .list_people()
        .map_err(|e| format!("failed to list people: {e}"))?;

    if people.is_empty() {
        println!("no people");
        println!("people are created automatically when mentioned in commitments");
        return Ok(());
    }

    println!("people:");
    for (i, p) in people.iter().enumerate() {
        println!("  {}. {} (id: {})", i + 1, p.name, p.id);
    }
    Ok(())
}

/// `who` may be the person's id or current name, in any case.
pub(super) fn cmd_rename_person(storage: &Storage, who: &str, name: &str) -> Result<(), String> {
    let mut person = storage
        .find_person_by_name(who)
        .map_err(|e| format!("failed to load person: {e}"))?;
    person.name = name.to_string();
    storage
        .save_person(&person)
        .map_err(|e| format!("failed to save person: {e}"))?;

    println!("updated person: {} (name: {})", person.id, person.name);
    Ok(())
}

pub(super) fn cmd_projects(storage: &Storage) -> Result<(), String> {
    let projects = storage
        .list_projects()
        .map_err(|e| format!("failed to list projects: {e}"))?;

    if projects.is_empty() {
        println!("no projects");
        println!("projects are created automatically when mentioned in commitments");
        return Ok(());
    }

    println!("projects:");
    for (i, p) in projects.iter().enumerate() {
        println!("  {}. {} (priority: {})", i + 1, p.id, priority_label(p.priority));
    }
    Ok(())
}

pub(super) fn cmd_set_priority(storage: &Storage, id: &str, priority: i64) -> Result<(), String> {
    let mut project = storage
        .get_project(id)
        .map_err(|e| format!("failed to load project: {e}"))?;
    project.priority = priority;
    storage
        .save_project(&project)
        .map_err(|e| format!("failed to save project: {e}"))?;

    println!(
        "updated project: {} (priority: {})",
        project.id,
        priority_label(project.priority)
    );
    Ok(())
}

pub(super) fn cmd_mark(storage: &Storage, id: &str, status: CommitmentStatus) -> Result<(), String> {
    let now = Zoned::now();
    let commitment = execute::mark(storage, id, status, now.date(), now.timestamp())
        .map_err(|e| format!("failed to mark commitment: {e}"))?;

    println!(
        "commitment to {} ({}) is now {}",
        commitment.person_id, commitment.expectation.description, commitment.status
    );
    Ok(())
}
