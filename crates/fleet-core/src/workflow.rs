//! Approval-and-publish state machine
//!
//! One unit of work is one (tracked file, repository) pair. Every unit runs
//! to `Done` or `Published` before the next begins; a publish-step failure
//! ends the unit, never the run.

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use fleet_content::diff::{self, Drift};

use crate::error::{Error, Result};
use crate::host::{Operator, RepoHost};
use crate::outcome::Outcome;
use crate::session::RunSession;

/// Branch, commit message, and file for one in-flight change.
///
/// Created when the operator approves an update, threaded through the
/// remaining transitions as a value, and dropped when the unit ends. At most
/// one exists per (file, repository) pair.
#[derive(Debug)]
pub struct PendingChange {
    pub branch: String,
    pub message_file: PathBuf,
    pub file: String,
}

/// Commit message authored for the current file category, reusable across
/// repositories within it.
#[derive(Debug, Default)]
pub struct MessageCache {
    text: Option<String>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache seeded with a fixed message, for mechanical change categories.
    pub fn seeded(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Terminal state of one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    Done,
    Published,
}

/// One (tracked file, repository) reconciliation attempt.
#[derive(Debug)]
pub struct UnitOfWork<'a> {
    /// Deployed file name, relative to the repository root.
    pub file: &'a str,
    pub outcome: &'a Outcome,
    /// Current repository content, `""` when the file is absent.
    pub current: &'a str,
}

enum State {
    Classified,
    AwaitingConfirm,
    AwaitingMessage,
    Publishing(PendingChange),
}

/// Drive one unit of work through the approval state machine.
pub fn run_unit(
    unit: UnitOfWork<'_>,
    host: &dyn RepoHost,
    operator: &dyn Operator,
    session: &RunSession,
    cache: &mut MessageCache,
) -> Result<WorkStatus> {
    for warning in &unit.outcome.warnings {
        operator.warn(host.name(), warning);
    }

    let mut state = State::Classified;
    loop {
        state = match state {
            State::Classified => match diff::classify(unit.current, &unit.outcome.desired) {
                Drift::Unchanged => {
                    tracing::info!(repo = host.name(), file = unit.file, "No update needed");
                    return Ok(WorkStatus::Done);
                }
                Drift::Changed(rendered) => {
                    operator.warn(host.name(), &format!("{} needs to be updated", unit.file));
                    operator.show_diff(&rendered);
                    if session.dry_run() {
                        return Ok(WorkStatus::Done);
                    }
                    State::AwaitingConfirm
                }
            },

            State::AwaitingConfirm => {
                let question = format!(
                    "Do you want to update the {} file in {}?",
                    unit.file,
                    host.name()
                );
                if operator.confirm(&question)? {
                    State::AwaitingMessage
                } else {
                    return Ok(WorkStatus::Done);
                }
            }

            State::AwaitingMessage => match acquire_message(operator, cache)? {
                Some(message_file) => State::Publishing(PendingChange {
                    branch: session.branch_name(unit.file),
                    message_file,
                    file: unit.file.to_string(),
                }),
                None => {
                    operator.warn(
                        host.name(),
                        "No commit message provided or updated, PR skipped",
                    );
                    return Ok(WorkStatus::Done);
                }
            },

            State::Publishing(change) => {
                return match publish(&unit, host, &change) {
                    Ok(()) => Ok(WorkStatus::Published),
                    Err(e) => {
                        operator.warn(
                            host.name(),
                            &format!("Publishing {} failed: {e}", change.file),
                        );
                        Ok(WorkStatus::Done)
                    }
                };
            }
        };
    }
}

/// Get a commit message, reusing the category's previous one if the operator
/// agrees. Returns the message file handed to the VCS collaborator, or
/// `None` when acquisition failed.
fn acquire_message(operator: &dyn Operator, cache: &mut MessageCache) -> Result<Option<PathBuf>> {
    let text = match cache.text.clone() {
        Some(previous) => {
            if operator.confirm("Do you want to reuse the previous commit message?")? {
                previous
            } else {
                match operator.edit_text(&previous)? {
                    Some(edited) => edited,
                    None => return Ok(None),
                }
            }
        }
        None => match operator.edit_text("")? {
            Some(edited) => edited,
            None => return Ok(None),
        },
    };

    cache.text = Some(text.clone());
    Ok(Some(write_message_file(&text)?))
}

fn write_message_file(text: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("fleet-msg-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;
    Ok(path)
}

/// Write the desired content into the working tree and run the publish
/// steps in strict order. Any failing step aborts the rest.
fn publish(unit: &UnitOfWork<'_>, host: &dyn RepoHost, change: &PendingChange) -> Result<()> {
    host.create_branch(&change.branch)?;

    let target = host.work_dir().join(unit.file);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &unit.outcome.desired)?;
    tracing::info!(repo = host.name(), file = unit.file, "Updated file");

    host.stage(unit.file)?;
    host.commit(&change.message_file)?;
    host.push(&change.branch)?;
    host.open_pull_request(unit.file, &change.branch, &change.message_file)?;
    host.ensure_main()?;
    Ok(())
}
