//! Repository operations.
//!
//! Git is driven as an opaque executable: every operation goes through a
//! [`CommandRunner`], which reports exit code and both output streams and
//! only fails when the program cannot be started at all.

mod changes;

pub use changes::{parse_name_status, ChangeKind, ChangeRecord};

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::Error;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed run with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    /// stderr, or stdout when stderr is empty.
    pub fn error_text(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

/// Runs an external program without shell interpretation.
///
/// A non-zero exit is a normal `Ok` result; `Err` means the program could
/// not be run.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, Error>;
}

/// Runs commands as child processes inside a working directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cwd: PathBuf,
}

impl SystemRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, Error> {
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.cwd)
            .output()
            .map_err(|source| Error::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            // Killed by a signal: no exit code.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Typed facade over the git invocations the save workflow issues.
pub struct Git<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    binary: &'a str,
}

impl<'a, R: CommandRunner + ?Sized> Git<'a, R> {
    pub fn new(runner: &'a R, binary: &'a str) -> Self {
        Self { runner, binary }
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput, Error> {
        let output = self.runner.run(self.binary, args)?;
        debug!(
            args = %args.join(" "),
            exit_code = output.exit_code,
            "git"
        );
        Ok(output)
    }

    /// `git checkout <branch> --`
    ///
    /// The trailing `--` keeps git from reading the name as a pathspec,
    /// which would restore a same-named file over unstaged edits.
    pub fn checkout(&self, branch: &str) -> Result<CommandOutput, Error> {
        self.git(&["checkout", branch, "--"])
    }

    /// `git update-index --refresh`
    pub fn refresh_index(&self) -> Result<CommandOutput, Error> {
        self.git(&["update-index", "--refresh"])
    }

    /// `git add -A`, deletions included.
    pub fn add_all(&self) -> Result<CommandOutput, Error> {
        self.git(&["add", "-A"])
    }

    /// `git diff --cached --name-status`
    pub fn staged_name_status(&self) -> Result<CommandOutput, Error> {
        self.git(&["diff", "--cached", "--name-status"])
    }

    /// `git status --porcelain`
    pub fn status_porcelain(&self) -> Result<CommandOutput, Error> {
        self.git(&["status", "--porcelain"])
    }

    /// `git commit -m <message>`
    pub fn commit(&self, message: &str) -> Result<CommandOutput, Error> {
        self.git(&["commit", "-m", message])
    }

    /// `git push <remote> <branch> --force`
    pub fn force_push(&self, remote: &str, branch: &str) -> Result<CommandOutput, Error> {
        self.git(&["push", remote, branch, "--force"])
    }

    /// `git rev-parse --short HEAD`, trimmed.
    pub fn short_head(&self) -> Result<String, Error> {
        let output = self.git(&["rev-parse", "--short", "HEAD"])?;
        let hash = output.stdout.trim();
        if !output.success() || hash.is_empty() {
            return Err(Error::other(format!(
                "git rev-parse failed: {}",
                output.error_text()
            )));
        }
        Ok(hash.to_string())
    }
}
