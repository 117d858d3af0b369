//! Prompt hook registration in `.claude/settings.json`.
//!
//! Adds or removes a `UserPromptSubmit` command hook, keeping every other
//! setting and hook in the file intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::Error;

/// Command registered by default.
pub const DEFAULT_HOOK_COMMAND: &str = "savehook hook";

/// Host event that carries user prompts.
const HOOK_EVENT: &str = "UserPromptSubmit";

/// Identifies our entries on uninstall.
const MARKER: &str = "savehook";

/// Settings file for a project.
pub fn settings_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".claude").join("settings.json")
}

/// Install the hook and report what happened.
pub fn install(project_dir: &Path, command: &str) -> Result<(), Error> {
    let path = settings_path(project_dir);
    let backup = path.with_extension("json.savehook.bak");
    if merge_hook(&path, &backup, command)? {
        info!(path = %path.display(), "Installed prompt hook");
        println!("Prompt hook installed in {}", path.display());
    } else {
        println!("Prompt hook already installed in {}", path.display());
    }
    Ok(())
}

/// Uninstall the hook and report what happened.
pub fn uninstall(project_dir: &Path) -> Result<(), Error> {
    let path = settings_path(project_dir);
    if remove_hook(&path)? {
        info!(path = %path.display(), "Removed prompt hook");
        println!("Prompt hook removed from {}", path.display());
    } else {
        println!("No prompt hook found.");
    }
    Ok(())
}

fn read_settings(path: &Path) -> Result<Value, Error> {
    if !path.exists() {
        return Ok(json!({}));
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(json!({}));
    }
    let value: Value = serde_json::from_str(&content)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(Error::other(format!(
            "{} is not a JSON object",
            path.display()
        )))
    }
}

fn write_settings(path: &Path, settings: &Value) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

/// Get `obj[key]` as an object or array, inserting `default` when missing.
fn entry<'v>(obj: &'v mut Map<String, Value>, key: &str, default: Value) -> &'v mut Value {
    obj.entry(key.to_string()).or_insert(default)
}

fn is_ours(hook: &Value) -> bool {
    hook.get("command")
        .and_then(Value::as_str)
        .map(|c| c.contains(MARKER))
        .unwrap_or(false)
}

fn group_hooks(group: &Value) -> impl Iterator<Item = &Value> {
    group
        .get("hooks")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Add our hook to the settings file. Returns false if already present.
///
/// An existing file is copied to `backup` before it is rewritten.
pub fn merge_hook(path: &Path, backup: &Path, command: &str) -> Result<bool, Error> {
    let mut settings = read_settings(path)?;
    let not_object = || Error::other(format!("unexpected hook layout in {}", path.display()));

    let root = settings.as_object_mut().ok_or_else(not_object)?;
    let hooks = entry(root, "hooks", json!({}))
        .as_object_mut()
        .ok_or_else(not_object)?;
    let groups = entry(hooks, HOOK_EVENT, json!([]))
        .as_array_mut()
        .ok_or_else(not_object)?;

    if groups.iter().flat_map(group_hooks).any(is_ours) {
        return Ok(false);
    }

    groups.push(json!({
        "hooks": [
            { "type": "command", "command": command }
        ]
    }));

    if path.exists() {
        fs::copy(path, backup)?;
    }
    write_settings(path, &settings)?;
    Ok(true)
}

/// Remove our hook from the settings file. Returns false if none was found.
///
/// Groups left empty are dropped, and so is the event list.
pub fn remove_hook(path: &Path) -> Result<bool, Error> {
    if !path.exists() {
        return Ok(false);
    }
    let mut settings = read_settings(path)?;

    let Some(hooks) = settings
        .get_mut("hooks")
        .and_then(Value::as_object_mut)
    else {
        return Ok(false);
    };
    let Some(groups) = hooks.get_mut(HOOK_EVENT).and_then(Value::as_array_mut) else {
        return Ok(false);
    };

    let mut removed = false;
    for group in groups.iter_mut() {
        if let Some(list) = group.get_mut("hooks").and_then(Value::as_array_mut) {
            let before = list.len();
            list.retain(|hook| !is_ours(hook));
            removed |= list.len() != before;
        }
    }
    if !removed {
        return Ok(false);
    }

    groups.retain(|group| group_hooks(group).next().is_some());
    if groups.is_empty() {
        hooks.remove(HOOK_EVENT);
    }

    write_settings(path, &settings)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(temp: &TempDir) -> (PathBuf, PathBuf) {
        let path = settings_path(temp.path());
        let backup = path.with_extension("json.savehook.bak");
        (path, backup)
    }

    fn load(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_merge_new_file() {
        let temp = TempDir::new().unwrap();
        let (path, backup) = paths(&temp);

        assert!(merge_hook(&path, &backup, DEFAULT_HOOK_COMMAND).unwrap());

        let settings = load(&path);
        assert_eq!(
            settings["hooks"]["UserPromptSubmit"][0]["hooks"][0]["command"],
            "savehook hook"
        );
        assert_eq!(
            settings["hooks"]["UserPromptSubmit"][0]["hooks"][0]["type"],
            "command"
        );
        assert!(!backup.exists());
    }

    #[test]
    fn test_merge_keeps_existing_settings() {
        let temp = TempDir::new().unwrap();
        let (path, backup) = paths(&temp);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let existing = json!({
            "permissions": { "allow": ["Bash(ls:*)"] },
            "hooks": {
                "UserPromptSubmit": [
                    { "hooks": [ { "type": "command", "command": "other-tool check" } ] }
                ],
                "Stop": [
                    { "hooks": [ { "type": "command", "command": "notify" } ] }
                ]
            }
        });
        fs::write(&path, serde_json::to_string_pretty(&existing).unwrap()).unwrap();

        assert!(merge_hook(&path, &backup, DEFAULT_HOOK_COMMAND).unwrap());

        let settings = load(&path);
        assert_eq!(settings["permissions"]["allow"][0], "Bash(ls:*)");
        assert_eq!(settings["hooks"]["Stop"][0]["hooks"][0]["command"], "notify");
        let groups = settings["hooks"]["UserPromptSubmit"].as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert!(backup.exists());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let (path, backup) = paths(&temp);

        assert!(merge_hook(&path, &backup, DEFAULT_HOOK_COMMAND).unwrap());
        assert!(!merge_hook(&path, &backup, "/usr/local/bin/savehook hook").unwrap());

        let settings = load(&path);
        assert_eq!(settings["hooks"]["UserPromptSubmit"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_merge_rejects_non_object() {
        let temp = TempDir::new().unwrap();
        let (path, backup) = paths(&temp);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2]").unwrap();

        assert!(merge_hook(&path, &backup, DEFAULT_HOOK_COMMAND).is_err());
    }

    #[test]
    fn test_remove_drops_empty_event() {
        let temp = TempDir::new().unwrap();
        let (path, backup) = paths(&temp);
        merge_hook(&path, &backup, DEFAULT_HOOK_COMMAND).unwrap();

        assert!(remove_hook(&path).unwrap());

        let settings = load(&path);
        assert!(settings["hooks"].get("UserPromptSubmit").is_none());
        assert!(!remove_hook(&path).unwrap());
    }

    #[test]
    fn test_remove_keeps_other_hooks() {
        let temp = TempDir::new().unwrap();
        let (path, _) = paths(&temp);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let existing = json!({
            "hooks": {
                "UserPromptSubmit": [
                    { "hooks": [
                        { "type": "command", "command": "other-tool check" },
                        { "type": "command", "command": "savehook hook" }
                    ] }
                ]
            }
        });
        fs::write(&path, existing.to_string()).unwrap();

        assert!(remove_hook(&path).unwrap());

        let settings = load(&path);
        let hooks = settings["hooks"]["UserPromptSubmit"][0]["hooks"]
            .as_array()
            .unwrap();
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0]["command"], "other-tool check");
    }

    #[test]
    fn test_remove_missing_file() {
        let temp = TempDir::new().unwrap();
        let (path, _) = paths(&temp);
        assert!(!remove_hook(&path).unwrap());
    }
}
