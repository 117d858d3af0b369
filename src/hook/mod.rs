//! Prompt hook contract.
//!
//! The host writes one JSON object with a `prompt` field to stdin and reads
//! one JSON object back from stdout: `{"blocked": false}` to let the prompt
//! through, or `{"blocked": true, "reason": "..."}` after a save run.

mod detector;

pub use detector::{detect, SaveCommand};

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::git::CommandRunner;
use crate::workflow::{self, Outcome, SaveWorkflow};

/// Hook input. Fields other than `prompt` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl HookInput {
    /// Prompt text; absent or null reads as empty.
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }
}

/// Hook output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookResponse {
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HookResponse {
    /// Let the host handle the prompt normally.
    pub fn pass() -> Self {
        Self {
            blocked: false,
            reason: None,
        }
    }

    /// Stop the host from handling the prompt, reporting `reason`.
    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            blocked: true,
            reason: Some(reason.into()),
        }
    }

    /// Serialize as a single line with `", "` and `": "` separators.
    pub fn to_json(&self) -> Result<String, Error> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| Error::other(e.to_string()))
    }
}

/// Compact JSON with a space after each separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Read hook input. Empty or malformed input reads as an empty prompt.
pub fn read_input<R: Read>(mut reader: R) -> Result<HookInput, Error> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    if content.trim().is_empty() {
        return Ok(HookInput::default());
    }

    match serde_json::from_str(&content) {
        Ok(input) => Ok(input),
        Err(e) => {
            warn!(error = %e, "malformed hook input, treating as empty prompt");
            Ok(HookInput::default())
        }
    }
}

/// Decide and, for a save command, run the workflow.
pub fn handle<R: CommandRunner + ?Sized>(
    input: &HookInput,
    config: &Config,
    runner: &R,
) -> HookResponse {
    let Some(command) = detect(input.prompt(), &config.trigger) else {
        return HookResponse::pass();
    };

    info!(annotation = ?command.annotation, "save command detected");
    let outcome = SaveWorkflow::new(config, runner).run(&command);
    workflow::respond(&outcome, config)
}

/// Response when the project dir or its configuration could not be resolved.
///
/// Detection falls back to the default trigger; a save command is blocked
/// and reports the error, anything else passes through.
pub fn handle_setup_error(input: &HookInput, error: &Error) -> HookResponse {
    let fallback = Config::default();
    if detect(input.prompt(), &fallback.trigger).is_none() {
        return HookResponse::pass();
    }

    warn!(error = %error, "save command received but setup failed");
    workflow::respond(
        &Outcome::UnexpectedError {
            error: error.to_string(),
        },
        &fallback,
    )
}

/// Write the response as one JSON line.
pub fn write_response<W: Write>(mut output: W, response: &HookResponse) -> Result<(), Error> {
    writeln!(output, "{}", response.to_json()?)?;
    output.flush()?;
    Ok(())
}
