//! Turns outcomes into hook responses.

use crate::config::Config;
use crate::git::{ChangeKind, ChangeRecord};
use crate::hook::HookResponse;

use super::{Outcome, SaveSummary};

/// Map a finished save run to the response returned to the host.
///
/// Every outcome blocks normal prompt processing.
pub fn respond(outcome: &Outcome, config: &Config) -> HookResponse {
    let reason = match outcome {
        Outcome::NoChanges => "ℹ️ No changes detected. Working directory is clean.".to_string(),
        Outcome::StageFailed => {
            "ℹ️ Could not stage changes. Working directory may be clean.".to_string()
        }
        Outcome::NothingToCommit => "ℹ️ No changes to commit.".to_string(),
        Outcome::CommitFailed { error } => format!("❌ Failed to commit: {}", error),
        Outcome::PushFailed { error } => format!("❌ Failed to push: {}", error),
        Outcome::UnexpectedError { error } => {
            format!("❌ Error executing {}: {}", config.trigger, error)
        }
        Outcome::Success(summary) => success_report(summary, config),
    };

    HookResponse::block(reason)
}

fn success_report(summary: &SaveSummary, config: &Config) -> String {
    let changes = if summary.changes.is_empty() {
        "Files updated".to_string()
    } else {
        summary
            .changes
            .iter()
            .map(change_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "✅ Project saved and pushed successfully!\n\n\
         📦 Commit: {}\n\
         🔖 Hash: {}\n\
         🌿 Branch: {}/{} (force pushed)\n\n\
         📝 Changes:\n{}",
        summary.message, summary.short_hash, config.remote, config.branch, changes
    )
}

fn change_line(change: &ChangeRecord) -> String {
    match change.kind {
        ChangeKind::Added => format!("  ➕ Added: {}", change),
        ChangeKind::Modified => format!("  📝 Modified: {}", change),
        ChangeKind::Deleted => format!("  ❌ Deleted: {}", change),
        ChangeKind::Renamed => format!("  ♻️ Renamed: {}", change),
        ChangeKind::Other => format!("  • {}", change),
    }
}
