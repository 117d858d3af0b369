//! Run the save workflow from a terminal.

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::git::SystemRunner;
use crate::hook::SaveCommand;
use crate::workflow::{self, SaveWorkflow};

/// Run a save and print the report. Returns the process exit code.
pub fn run(project_dir: &Path, message: &[String]) -> Result<i32, Error> {
    let (config, _) = Config::load(project_dir)?;

    let annotation = message.join(" ");
    let command = SaveCommand {
        annotation: (!annotation.trim().is_empty()).then(|| annotation.trim().to_string()),
    };

    let runner = SystemRunner::new(config.repo_root(project_dir));
    info!(repo = %runner.cwd().display(), annotation = ?command.annotation, "saving");
    let outcome = SaveWorkflow::new(&config, &runner).run(&command);

    if let Some(reason) = workflow::respond(&outcome, &config).reason {
        println!("{}", reason);
    }

    Ok(if outcome.is_ok() { 0 } else { 1 })
}
