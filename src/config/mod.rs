//! Save workflow configuration.
//!
//! Handles loading and saving `.savehook/config.toml`. A project file wins
//! over the global one in `~/.savehook/`; with neither present every field
//! takes its default.

use std::fs;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Directory holding savehook files, both per project and in the home dir.
const CONFIG_DIR: &str = ".savehook";

/// Config file name inside [`CONFIG_DIR`].
const CONFIG_FILE: &str = "config.toml";

/// Save workflow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Repository to snapshot. Relative paths resolve against the project dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_root: Option<PathBuf>,

    /// Primary branch, also the push target.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Remote receiving the force-push.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Prompt prefix that triggers a save.
    #[serde(default = "default_trigger")]
    pub trigger: String,

    /// First part of every commit message.
    #[serde(default = "default_commit_prefix")]
    pub commit_prefix: String,

    /// chrono strftime format for the commit timestamp (local time).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Matched case-insensitively against failed commit output.
    ///
    /// This couples us to git's wording: if git ever rephrases the message,
    /// an empty commit would surface as a commit failure instead.
    #[serde(default = "default_nothing_to_commit_pattern")]
    pub nothing_to_commit_pattern: String,

    /// Abort the run when the branch switch fails.
    #[serde(default)]
    pub strict_checkout: bool,

    /// Executable used for repository operations.
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

// Default value functions
fn default_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_trigger() -> String {
    "/save".to_string()
}

fn default_commit_prefix() -> String {
    "Auto-save".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_nothing_to_commit_pattern() -> String {
    "nothing to commit".to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_root: None,
            branch: default_branch(),
            remote: default_remote(),
            trigger: default_trigger(),
            commit_prefix: default_commit_prefix(),
            timestamp_format: default_timestamp_format(),
            nothing_to_commit_pattern: default_nothing_to_commit_pattern(),
            strict_checkout: false,
            git_binary: default_git_binary(),
        }
    }
}

impl Config {
    /// Config file path for a project.
    pub fn project_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Global config file path (`~/.savehook/config.toml`).
    pub fn global_path() -> Result<PathBuf, Error> {
        let home = dirs::home_dir().ok_or(Error::HomeDirNotFound)?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the effective config for a project.
    ///
    /// Returns the config and the file it came from, if any.
    pub fn load(project_dir: &Path) -> Result<(Self, Option<PathBuf>), Error> {
        let project = Self::project_path(project_dir);
        if project.exists() {
            return Ok((Self::load_from(&project)?, Some(project)));
        }

        // A missing home dir just means there is no global file.
        if let Ok(global) = Self::global_path() {
            if global.exists() {
                return Ok((Self::load_from(&global)?, Some(global)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save config to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = self.to_toml()?;
        let with_header = format!(
            "# savehook configuration\n# Edit directly or regenerate with 'savehook config --init'\n\n{}",
            content
        );
        fs::write(path, with_header)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self).map_err(|e| Error::other(e.to_string()))
    }

    /// Resolve the repository root against the project dir.
    pub fn repo_root(&self, project_dir: &Path) -> PathBuf {
        match &self.repo_root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => project_dir.join(root),
            None => project_dir.to_path_buf(),
        }
    }

    /// Compile the "nothing to commit" classifier.
    pub fn nothing_to_commit_matcher(&self) -> Result<Regex, Error> {
        Ok(RegexBuilder::new(&self.nothing_to_commit_pattern)
            .case_insensitive(true)
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.branch, "main");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.trigger, "/save");
        assert_eq!(config.commit_prefix, "Auto-save");
        assert!(!config.strict_checkout);
        assert!(config.repo_root.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = Config::project_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "branch = \"trunk\"\nstrict_checkout = true\n").unwrap();

        let (config, source) = Config::load(dir.path()).unwrap();
        assert_eq!(config.branch, "trunk");
        assert!(config.strict_checkout);
        assert_eq!(config.remote, "origin");
        assert_eq!(source, Some(path));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = Config::project_path(dir.path());

        let config = Config {
            remote: "backup".to_string(),
            repo_root: Some(PathBuf::from("app")),
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "branch = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_repo_root_resolution() {
        let project = Path::new("/work/project");

        let config = Config::default();
        assert_eq!(config.repo_root(project), PathBuf::from("/work/project"));

        let config = Config {
            repo_root: Some(PathBuf::from("frontend")),
            ..Config::default()
        };
        assert_eq!(
            config.repo_root(project),
            PathBuf::from("/work/project/frontend")
        );

        let config = Config {
            repo_root: Some(PathBuf::from("/elsewhere")),
            ..Config::default()
        };
        assert_eq!(config.repo_root(project), PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_nothing_to_commit_matcher_ignores_case() {
        let matcher = Config::default().nothing_to_commit_matcher().unwrap();
        assert!(matcher.is_match("On branch main\nNothing To Commit, working tree clean"));
        assert!(!matcher.is_match("fatal: unable to auto-detect email address"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = Config {
            nothing_to_commit_pattern: "(".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.nothing_to_commit_matcher(),
            Err(Error::Pattern(_))
        ));
    }
}
