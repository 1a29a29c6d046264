// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Per-file analysis warnings.
//!
//! A warning records why one file was analyzed less thoroughly than the
//! rest. It travels on that file's record and is aggregated into the report.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Detect,
    Correlate,
    Analyze,
    Classify,
    Score,
    Report,
}

impl Stage {
    /// All stages in execution order.
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Detect,
            Stage::Correlate,
            Stage::Analyze,
            Stage::Classify,
            Stage::Score,
            Stage::Report,
        ]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Detect => write!(f, "detect"),
            Stage::Correlate => write!(f, "correlate"),
            Stage::Analyze => write!(f, "analyze"),
            Stage::Classify => write!(f, "classify"),
            Stage::Score => write!(f, "score"),
            Stage::Report => write!(f, "report"),
        }
    }
}

/// Warning severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    /// Informational, not a problem.
    Info,
    /// The file's classification was degraded.
    Warning,
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningLevel::Info => write!(f, "info"),
            WarningLevel::Warning => write!(f, "warning"),
        }
    }
}

/// Warning codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Content could not be read.
    FileRead,
    /// Content is binary.
    Binary,
    /// Structural parsing failed.
    Parse,
    /// Structural parsing ran out of time.
    Timeout,
    /// File was past the analysis limit.
    LimitExceeded,
}

impl WarningKind {
    /// Whether the file's classification falls back to chore/unclassified.
    pub fn is_degrading(&self) -> bool {
        matches!(
            self,
            WarningKind::FileRead | WarningKind::Parse | WarningKind::Timeout
        )
    }

    /// Severity level of this kind.
    pub fn level(&self) -> WarningLevel {
        if self.is_degrading() {
            WarningLevel::Warning
        } else {
            WarningLevel::Info
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::FileRead => write!(f, "file-read"),
            WarningKind::Binary => write!(f, "binary"),
            WarningKind::Parse => write!(f, "parse"),
            WarningKind::Timeout => write!(f, "timeout"),
            WarningKind::LimitExceeded => write!(f, "limit-exceeded"),
        }
    }
}

/// A warning attached to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisWarning {
    /// The file this warning is about.
    pub path: String,
    /// Stage that raised it.
    pub stage: Stage,
    /// Warning code.
    pub kind: WarningKind,
    /// Human-readable message.
    pub message: String,
}

impl AnalysisWarning {
    /// Create a warning.
    pub fn new(path: &str, stage: Stage, kind: WarningKind, message: impl Into<String>) -> Self {
        let warning = Self {
            path: path.to_string(),
            stage,
            kind,
            message: message.into(),
        };
        match warning.level() {
            WarningLevel::Warning => tracing::warn!("{}", warning),
            WarningLevel::Info => tracing::debug!("{}", warning),
        }
        warning
    }

    /// Convert a recoverable per-file error.
    pub fn from_error(stage: Stage, error: &AnalysisError) -> Self {
        match error {
            AnalysisError::FileRead { path, .. } => {
                Self::new(path, stage, WarningKind::FileRead, error.to_string())
            }
            AnalysisError::Parse { path, .. } => {
                Self::new(path, stage, WarningKind::Parse, error.to_string())
            }
            AnalysisError::Timeout { path, .. } => {
                Self::new(path, stage, WarningKind::Timeout, error.to_string())
            }
        }
    }

    /// Severity level.
    pub fn level(&self) -> WarningLevel {
        self.kind.level()
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.stage, self.path, self.kind, self.message
        )
    }
}
