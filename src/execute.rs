//! Execution: applying resolved actions to the store.

use jiff::{Timestamp, civil::Date};
use tracing::info;

use crate::{
    model::{Action, Commitment, CommitmentEvent, CommitmentEventKind, CommitmentStatus, Entry},
    storage::{Result, Storage},
};

/// Applies `action`, extracted from `entry`, to the day `today`.
///
/// Returns a one-line summary for the user.
pub fn apply(
    storage: &Storage,
    action: &Action,
    entry: &Entry,
    today: Date,
    now: Timestamp,
) -> Result<String> {
    match action {
        Action::Log => {
            storage.append_log(today, entry)?;
            Ok("logged".to_string())
        }
        Action::Correction => {
            storage.append_note(today, &format!("correction: {}", entry.raw))?;
            Ok("correction noted".to_string())
        }
        Action::Progress(progress) => {
            storage.append_log(today, entry)?;
            let mut summary = format!("progress on {}", progress.project_id);
            for detail in [&progress.status, &progress.notes] {
                if !detail.is_empty() {
                    summary.push_str(": ");
                    summary.push_str(detail);
                }
            }
            Ok(summary)
        }
        Action::Event(event) => {
            storage.append_log(today, entry)?;
            let title = if event.title.is_empty() { "event" } else { &event.title };
            let mut summary = format!("{title} at {}", event.time.strftime("%Y-%m-%d %H:%M"));
            if let Some(person) = &event.person_id {
                summary.push_str(&format!(" with {person}"));
            }
            if let Some(project) = &event.project_id {
                summary.push_str(&format!(" ({project})"));
            }
            Ok(summary)
        }
        Action::Commitment(commitment) => {
            storage.save_commitment(commitment)?;
            storage.append_commitment(today, commitment)?;
            info!(commitment = %commitment.id, person = %commitment.person_id, "commitment created");
            Ok(format!(
                "commitment to {}: {} (due {})",
                commitment.person_id, commitment.expectation.description, commitment.expectation.deadline
            ))
        }
        Action::Update(update) => {
            let commitment = transition(
                storage,
                &update.commitment_id,
                update.new_status,
                &update.description,
                today,
                now,
            )?;
            Ok(format!("commitment {} is now {}", commitment.id, commitment.status))
        }
    }
}

/// Sets a commitment's status from outside the extraction flow
/// (fulfilled, violated, archived).
///
/// Any status may follow any other; closed commitments can be reopened.
pub fn mark(
    storage: &Storage,
    commitment_id: &str,
    status: CommitmentStatus,
    today: Date,
    now: Timestamp,
) -> Result<Commitment> {
    transition(storage, commitment_id, status, &format!("marked {status}"), today, now)
}

fn transition(
    storage: &Storage,
    commitment_id: &str,
    status: CommitmentStatus,
    description: &str,
    today: Date,
    now: Timestamp,
) -> Result<Commitment> {
    let mut commitment = storage.get_commitment(commitment_id)?;
    commitment.status = status;
    commitment.last_update_at = Some(now);
    commitment.history.push(CommitmentEvent {
        timestamp: now,
        kind: CommitmentEventKind::for_status(status),
        description: description.to_string(),
    });
    storage.save_commitment(&commitment)?;
    storage.append_commitment(today, &commitment)?;
    info!(commitment = %commitment.id, %status, "commitment updated");
    Ok(commitment)
}
