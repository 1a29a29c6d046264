// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Name-status rendering of git2 diffs.

use crate::error::{GitError, LensError, Result};

/// One name-status entry before it is rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameStatusEntry {
    /// Status letter(s), e.g. `M` or `R100`.
    pub status: String,
    /// Path on the base side (renames and copies only).
    pub old_path: Option<String>,
    /// Path on the head side.
    pub path: String,
}

impl NameStatusEntry {
    /// Render as a single `git diff --name-status` line.
    pub fn to_line(&self) -> String {
        match self.old_path {
            Some(ref old) => format!("{}\t{}\t{}", self.status, old, self.path),
            None => format!("{}\t{}", self.status, self.path),
        }
    }
}

/// Render entries as name-status text.
pub fn render_name_status(entries: &[NameStatusEntry]) -> String {
    entries
        .iter()
        .map(NameStatusEntry::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collect name-status entries from a git2 diff, in diff order.
pub fn entries_from_diff(diff: &git2::Diff<'_>) -> Result<Vec<NameStatusEntry>> {
    let mut entries = Vec::new();

    for delta in diff.deltas() {
        let new_path = delta
            .new_file()
            .path()
            .map(|p| p.to_string_lossy().replace('\\', "/"));
        let old_path = delta
            .old_file()
            .path()
            .map(|p| p.to_string_lossy().replace('\\', "/"));

        let (status, old, path) = match delta.status() {
            git2::Delta::Added | git2::Delta::Untracked => ("A", None, new_path),
            git2::Delta::Deleted => ("D", None, old_path),
            git2::Delta::Modified => ("M", None, new_path),
            git2::Delta::Typechange => ("T", None, new_path),
            git2::Delta::Renamed => ("R100", old_path, new_path),
            git2::Delta::Copied => ("C100", old_path, new_path),
            _ => continue,
        };

        let path = path.ok_or_else(|| {
            LensError::Git(GitError::DiffFailed {
                message: "diff entry without a path".to_string(),
            })
        })?;

        entries.push(NameStatusEntry {
            status: status.to_string(),
            old_path: old,
            path,
        });
    }

    Ok(entries)
}
