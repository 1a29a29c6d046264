// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Change detection from name-status output.

use crate::error::Result;
use crate::git::VcsReader;

use super::change::{ChangeStatus, FileChange};

/// Enumerates file-level changes between two revisions.
pub struct ChangeDetector<'a> {
    reader: &'a dyn VcsReader,
}

impl<'a> ChangeDetector<'a> {
    /// Create a detector over a reader.
    pub fn new(reader: &'a dyn VcsReader) -> Self {
        Self { reader }
    }

    /// List changes between `base` and `head` in diff order.
    pub fn detect(&self, base: &str, head: &str) -> Result<Vec<FileChange>> {
        self.reader.resolve(base)?;
        self.reader.resolve(head)?;

        let text = self.reader.name_status(base, head)?;
        let changes = parse_name_status(&text);
        tracing::debug!("Detected {} changed files", changes.len());
        Ok(changes)
    }
}

/// Parse `git diff --name-status` text.
///
/// Blank lines and unknown status letters are skipped.
pub fn parse_name_status(text: &str) -> Vec<FileChange> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<FileChange> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }

    let mut fields = line.split('\t');
    let letter = fields.next()?.trim();
    let first = fields.next().map(str::trim).filter(|p| !p.is_empty());
    let second = fields.next().map(str::trim).filter(|p| !p.is_empty());

    let Some(status) = ChangeStatus::from_letter(letter) else {
        tracing::debug!("Skipping unknown status line: {}", line);
        return None;
    };

    match (status, letter.starts_with('C'), first, second) {
        (ChangeStatus::Renamed, _, Some(old), Some(new)) => Some(FileChange::renamed(old, new)),
        // A copy is an addition of the destination.
        (ChangeStatus::Added, true, Some(_), Some(new)) => {
            Some(FileChange::new(new, ChangeStatus::Added))
        }
        (ChangeStatus::Renamed, _, _, _) | (_, true, _, _) => {
            tracing::debug!("Skipping malformed status line: {}", line);
            None
        }
        (status, false, Some(path), _) => Some(FileChange::new(path, status)),
        _ => {
            tracing::debug!("Skipping malformed status line: {}", line);
            None
        }
    }
}
