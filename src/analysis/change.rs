// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! File-level change records produced by the first two stages.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::language::FileType;
use super::warnings::AnalysisWarning;

/// How a file changed between the two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeStatus {
    /// Parse a name-status letter (`R` and `C` carry a similarity score).
    pub fn from_letter(status: &str) -> Option<Self> {
        match status.chars().next()? {
            'A' | 'C' => Some(ChangeStatus::Added),
            'M' | 'T' => Some(ChangeStatus::Modified),
            'D' => Some(ChangeStatus::Deleted),
            'R' => Some(ChangeStatus::Renamed),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Added => write!(f, "added"),
            ChangeStatus::Modified => write!(f, "modified"),
            ChangeStatus::Deleted => write!(f, "deleted"),
            ChangeStatus::Renamed => write!(f, "renamed"),
        }
    }
}

/// A single file-level change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// Path at the head revision (base revision for deletions).
    pub path: String,
    /// Change status.
    pub status: ChangeStatus,
    /// Path at the base revision, for renames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
}

impl FileChange {
    /// Create a non-rename change.
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
            previous_path: None,
        }
    }

    /// Create a rename.
    pub fn renamed(previous_path: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: ChangeStatus::Renamed,
            previous_path: Some(previous_path.into()),
        }
    }

    /// Path to read the pre-image from.
    pub fn base_path(&self) -> &str {
        self.previous_path.as_deref().unwrap_or(&self.path)
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Size and language of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMetadata {
    pub lines_added: usize,
    pub lines_removed: usize,
    pub file_type: FileType,
}

/// Pre- and post-image text. `None` when absent, unreadable or binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSnapshot {
    pub old: Option<String>,
    pub new: Option<String>,
}

impl ContentSnapshot {
    /// Whether either side has text.
    pub fn has_text(&self) -> bool {
        self.old.is_some() || self.new.is_some()
    }
}

/// A change with its import context attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextualizedChange {
    #[serde(flatten)]
    pub change: FileChange,
    /// Files reachable through imports, in discovery order.
    pub related_files: Vec<String>,
    /// Related files that are also part of the change set.
    pub dependencies: Vec<String>,
    pub metadata: ChangeMetadata,
    #[serde(rename = "contextWarnings", skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalysisWarning>,
    #[serde(skip)]
    pub content: ContentSnapshot,
}

impl ContextualizedChange {
    /// Path of the underlying change.
    pub fn path(&self) -> &str {
        &self.change.path
    }
}
