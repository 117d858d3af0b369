//! Prompt hook entry point.

use std::io;
use std::path::PathBuf;

use tracing::warn;

use crate::config::Config;
use crate::error::Error;
use crate::git::SystemRunner;
use crate::hook::{self, HookInput, HookResponse};

/// Read one prompt from stdin and answer on stdout.
///
/// Always writes a response, even when the project dir could not be
/// resolved; only a failed write is an error.
pub fn run(project_dir: Result<PathBuf, Error>) -> Result<(), Error> {
    let input = hook::read_input(io::stdin().lock()).unwrap_or_else(|e| {
        warn!(error = %e, "failed to read hook input");
        HookInput::default()
    });

    let response = respond(&input, project_dir);
    hook::write_response(io::stdout().lock(), &response)
}

/// Resolve config for the project and handle the prompt.
fn respond(input: &HookInput, project_dir: Result<PathBuf, Error>) -> HookResponse {
    let loaded = project_dir.and_then(|dir| Config::load(&dir).map(|(config, _)| (dir, config)));

    match loaded {
        Ok((dir, config)) => {
            let runner = SystemRunner::new(config.repo_root(&dir));
            hook::handle(input, &config, &runner)
        }
        Err(e) => hook::handle_setup_error(input, &e),
    }
}
