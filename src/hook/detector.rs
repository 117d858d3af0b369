//! Save command detection.

/// A recognised save command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCommand {
    /// Free text after the trigger, appended to the commit message.
    pub annotation: Option<String>,
}

/// Check whether a prompt is a save command.
///
/// The prompt is trimmed, then must start with `trigger` (case-sensitive).
/// Whatever follows the trigger, trimmed, becomes the annotation. An empty
/// trigger never matches.
pub fn detect(prompt: &str, trigger: &str) -> Option<SaveCommand> {
    if trigger.is_empty() {
        return None;
    }

    let rest = prompt.trim().strip_prefix(trigger)?;
    let annotation = rest.trim();

    Some(SaveCommand {
        annotation: (!annotation.is_empty()).then(|| annotation.to_string()),
    })
}
