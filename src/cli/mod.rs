//! CLI commands for savehook.

pub mod config;
pub mod hook;
pub mod install;
pub mod save;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Error;

/// Environment variable set by the host for hook processes.
const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// savehook - snapshot and publish a working tree from a prompt
#[derive(Parser)]
#[command(name = "savehook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project directory (defaults to $CLAUDE_PROJECT_DIR, then the current dir)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle one prompt from stdin (default)
    Hook,

    /// Stage, commit and force-push now
    Save {
        /// Annotation appended to the commit message
        message: Vec<String>,
    },

    /// Register the prompt hook in .claude/settings.json
    Install {
        /// Command the host should run
        #[arg(long, default_value = install::DEFAULT_HOOK_COMMAND)]
        command: String,
    },

    /// Remove the prompt hook from .claude/settings.json
    Uninstall,

    /// Show the effective configuration
    Config {
        /// Write a default project config file
        #[arg(long)]
        init: bool,
    },
}

/// Resolve the project directory: flag, then host env var, then cwd.
pub fn project_dir(flag: Option<PathBuf>) -> Result<PathBuf, Error> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    match std::env::var_os(PROJECT_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(std::env::current_dir()?),
    }
}
