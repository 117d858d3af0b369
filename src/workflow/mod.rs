//! Save workflow.
//!
//! Drives the repository through checkout, stage, commit and force-push,
//! stopping at the first decisive result. Every run ends in exactly one
//! [`Outcome`]; errors never escape [`SaveWorkflow::run`].

mod report;


pub use report::respond;

use std::fmt::Write;

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::git::{parse_name_status, ChangeRecord, CommandRunner, Git};
use crate::hook::SaveCommand;

/// Details of a published snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub message: String,
    pub short_hash: String,
    pub changes: Vec<ChangeRecord>,
}

/// Terminal state of a save run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing staged and nothing unstaged.
    NoChanges,
    /// The tree is dirty but staging produced nothing, twice.
    StageFailed,
    /// Commit reported there was nothing to commit.
    NothingToCommit,
    /// Commit failed for another reason.
    CommitFailed { error: String },
    /// Committed and pushed.
    Success(SaveSummary),
    /// Committed locally, push rejected. The local commit stays.
    PushFailed { error: String },
    /// Anything else, e.g. git could not be started.
    UnexpectedError { error: String },
}

impl Outcome {
    /// Whether the run left the repository in the requested state.
    pub fn is_ok(&self) -> bool {
        matches!(
            self,
            Outcome::Success(_) | Outcome::NoChanges | Outcome::NothingToCommit
        )
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::NoChanges => "no_changes",
            Outcome::StageFailed => "stage_failed",
            Outcome::NothingToCommit => "nothing_to_commit",
            Outcome::CommitFailed { .. } => "commit_failed",
            Outcome::Success(_) => "success",
            Outcome::PushFailed { .. } => "push_failed",
            Outcome::UnexpectedError { .. } => "unexpected_error",
        }
    }
}

/// Build the commit message: `<prefix>: <timestamp>[ - <annotation>]`.
pub fn commit_message(prefix: &str, timestamp: &str, annotation: Option<&str>) -> String {
    match annotation {
        Some(note) if !note.is_empty() => format!("{}: {} - {}", prefix, timestamp, note),
        _ => format!("{}: {}", prefix, timestamp),
    }
}

/// Render `now` with a strftime format, rejecting unknown specifiers.
fn format_timestamp(now: DateTime<Local>, format: &str) -> Result<String, Error> {
    let mut out = String::new();
    write!(out, "{}", now.format(format))
        .map_err(|_| Error::other(format!("invalid timestamp format: {}", format)))?;
    Ok(out)
}

/// Runs the save sequence against one repository.
pub struct SaveWorkflow<'a, R: CommandRunner + ?Sized> {
    config: &'a Config,
    git: Git<'a, R>,
}

impl<'a, R: CommandRunner + ?Sized> SaveWorkflow<'a, R> {
    pub fn new(config: &'a Config, runner: &'a R) -> Self {
        Self {
            config,
            git: Git::new(runner, &config.git_binary),
        }
    }

    /// Run with the current local time as commit timestamp.
    pub fn run(&self, command: &SaveCommand) -> Outcome {
        self.run_at(command, Local::now())
    }

    /// Run with an explicit commit timestamp.
    pub fn run_at(&self, command: &SaveCommand, now: DateTime<Local>) -> Outcome {
        let outcome = match self.try_run(command, now) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::UnexpectedError {
                error: e.to_string(),
            },
        };
        info!(outcome = outcome.name(), "save finished");
        outcome
    }

    fn try_run(&self, command: &SaveCommand, now: DateTime<Local>) -> Result<Outcome, Error> {
        // Compile before touching the repository so a bad pattern is a no-op.
        let nothing_to_commit = self.config.nothing_to_commit_matcher()?;

        self.prepare()?;

        self.git.add_all()?;
        let mut staged = self.git.staged_name_status()?;

        if staged.stdout.trim().is_empty() {
            let status = self.git.status_porcelain()?;
            if status.stdout.trim().is_empty() {
                return Ok(Outcome::NoChanges);
            }

            // Dirty tree but nothing staged: one more attempt.
            self.git.add_all()?;
            staged = self.git.staged_name_status()?;
            if staged.stdout.trim().is_empty() {
                warn!("working tree is dirty but nothing could be staged");
                return Ok(Outcome::StageFailed);
            }
        }

        let changes = parse_name_status(&staged.stdout);

        let timestamp = format_timestamp(now, &self.config.timestamp_format)?;
        let message = commit_message(
            &self.config.commit_prefix,
            &timestamp,
            command.annotation.as_deref(),
        );

        if let Some(outcome) = self.commit(&message, &nothing_to_commit)? {
            return Ok(outcome);
        }

        let push = self.git.force_push(&self.config.remote, &self.config.branch)?;
        if !push.success() {
            warn!(
                remote = %self.config.remote,
                branch = %self.config.branch,
                "push failed, local commit kept"
            );
            return Ok(Outcome::PushFailed {
                error: push.error_text().to_string(),
            });
        }

        let short_hash = self.git.short_head()?;
        Ok(Outcome::Success(SaveSummary {
            message,
            short_hash,
            changes,
        }))
    }

    /// Best-effort branch switch and index refresh.
    fn prepare(&self) -> Result<(), Error> {
        let checkout = self.git.checkout(&self.config.branch)?;
        if !checkout.success() {
            if self.config.strict_checkout {
                return Err(Error::Checkout {
                    branch: self.config.branch.clone(),
                    message: checkout.error_text().to_string(),
                });
            }
            warn!(
                branch = %self.config.branch,
                error = checkout.error_text(),
                "branch switch failed, continuing on current branch"
            );
        }

        // update-index exits 1 whenever files need updating; that is expected.
        let refresh = self.git.refresh_index()?;
        if !refresh.success() && !refresh.stderr.trim().is_empty() {
            warn!(error = refresh.error_text(), "index refresh failed");
        }

        Ok(())
    }

    /// Commit, returning the terminal outcome when it fails.
    fn commit(&self, message: &str, nothing_to_commit: &Regex) -> Result<Option<Outcome>, Error> {
        let commit = self.git.commit(message)?;
        if commit.success() {
            return Ok(None);
        }

        if nothing_to_commit.is_match(&commit.combined()) {
            return Ok(Some(Outcome::NothingToCommit));
        }

        Ok(Some(Outcome::CommitFailed {
            error: commit.error_text().to_string(),
        }))
    }
}
