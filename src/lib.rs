//! savehook library.
//!
//! Prompt hook that turns a `/save` prompt into stage, commit and
//! force-push, and passes every other prompt through.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hook;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use error::Error;
