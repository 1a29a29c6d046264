// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for commitlens.
//!
//! Only repository, rule configuration and configuration errors are fatal to
//! a pipeline run. Per-file [`AnalysisError`]s are turned into warnings by the
//! stage that hits them and never reach the caller.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for commitlens operations.
#[derive(Error, Debug)]
pub enum LensError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    // Rule set errors
    #[error("Rule configuration error: {0}")]
    Rule(#[from] RuleConfigError),

    // Per-file analysis errors surfaced directly (stage helpers only)
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    // Rendering errors
    #[error("Render error: {0}")]
    Render(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl LensError {
    /// Whether this error aborts a pipeline run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LensError::Analysis(_))
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Git-related errors.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Repository unavailable: {message}")]
    Unavailable { message: String },

    #[error("Cannot resolve revision '{revision}': {message}")]
    InvalidRevision { revision: String, message: String },

    #[error("Failed to get diff: {message}")]
    DiffFailed { message: String },

    #[error("Failed to read '{path}' at '{revision}': {message}")]
    ReadFailed {
        path: String,
        revision: String,
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Unavailable {
            message: err.message().to_string(),
        }
    }
}

/// Rule set errors. Raised while loading rules, before any file is processed.
#[derive(Error, Debug)]
pub enum RuleConfigError {
    #[error("Rule #{index} has no id")]
    MissingId { index: usize },

    #[error("Duplicate rule id: {id}")]
    DuplicateId { id: String },

    #[error("Rule '{id}' declares no match, matchPath or matchAst predicate")]
    NoPredicate { id: String },

    #[error("Rule '{id}' has invalid type '{value}'")]
    InvalidType { id: String, value: String },

    #[error("Rule '{id}' has invalid glob '{pattern}': {message}")]
    InvalidGlob {
        id: String,
        pattern: String,
        message: String,
    },

    #[error("Rule '{id}' has invalid structural pattern '{pattern}': {message}")]
    InvalidAstPattern {
        id: String,
        pattern: String,
        message: String,
    },

    #[error("Rule '{id}' has invalid heuristic '{expression}': {message}")]
    InvalidHeuristic {
        id: String,
        expression: String,
        message: String,
    },

    #[error("Invalid pattern '{pattern}' in '{key}': {message}")]
    InvalidPattern {
        key: String,
        pattern: String,
        message: String,
    },

    #[error("Failed to read rules from {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("Failed to parse rules: {message}")]
    ParseFailed { message: String },
}

/// Recoverable per-file errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("cannot read {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("parsing {path} exceeded {timeout_ms}ms")]
    Timeout { path: String, timeout_ms: u64 },
}

/// Result type alias for commitlens operations.
pub type Result<T> = std::result::Result<T, LensError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| LensError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config"),
        };
        assert!(err.to_string().contains("/path/to/config"));
    }

    #[test]
    fn test_invalid_revision_display() {
        let err = GitError::InvalidRevision {
            revision: "nope".to_string(),
            message: "revspec 'nope' not found".to_string(),
        };
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_rule_error_converts() {
        let err: LensError = RuleConfigError::DuplicateId {
            id: "docs".to_string(),
        }
        .into();
        assert!(err.to_string().contains("docs"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_analysis_error_not_fatal() {
        let err: LensError = AnalysisError::Timeout {
            path: "src/a.ts".to_string(),
            timeout_ms: 5000,
        }
        .into();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_context_wraps_message() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        ));
        let err = result.context("cache").unwrap_err();
        assert_eq!(err.to_string(), "cache: disk full");
    }
}
