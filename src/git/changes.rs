//! Staged change parsing.
//!
//! Reads `git diff --cached --name-status` output into [`ChangeRecord`]s.

use std::fmt;

/// Kind of a staged change, from the first letter of the status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Other,
}

impl ChangeKind {
    fn from_status(status: &str) -> Self {
        match status.chars().next() {
            Some('A') => Self::Added,
            Some('M') => Self::Modified,
            Some('D') => Self::Deleted,
            Some('R') => Self::Renamed,
            _ => Self::Other,
        }
    }
}

/// One staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub path: String,
    /// Source path for renames and copies.
    pub from: Option<String>,
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{} -> {}", from, self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// Parse name-status output.
///
/// Lines look like `M\tsrc/lib.rs`, or `R087\told\tnew` for renames and
/// copies. Blank lines and lines without a tab are skipped.
pub fn parse_name_status(output: &str) -> Vec<ChangeRecord> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let status = fields.next()?.trim();
            let first = fields.next()?;
            if status.is_empty() || first.is_empty() {
                return None;
            }

            let record = match fields.next() {
                Some(second) if !second.is_empty() => ChangeRecord {
                    kind: ChangeKind::from_status(status),
                    path: second.to_string(),
                    from: Some(first.to_string()),
                },
                _ => ChangeRecord {
                    kind: ChangeKind::from_status(status),
                    path: first.to_string(),
                    from: None,
                },
            };
            Some(record)
        })
        .collect()
}
