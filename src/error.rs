//! Error types for savehook.

use std::path::PathBuf;

use thiserror::Error;

/// Crate error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to switch to branch {branch}: {message}")]
    Checkout { branch: String, message: String },

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
