// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! commitlens - semantic change classification for git diffs
//!
//! Turns the difference between two revisions into per-file conventional
//! commit types, importance scores and a suggested commit message.
//!
//! # Pipeline
//!
//! - **Detect**: name-status changes between two revisions
//! - **Correlate**: import relationships among changed files
//! - **Analyze**: structural deltas from declared symbols
//! - **Classify**: ordered rules assign a commit type and breaking flag
//! - **Score**: importance in `[0, 10]` from weighted factors
//! - **Report**: summary, primary type and suggested commit
//!
//! # Example
//!
//! ```no_run
//! use commitlens::git::GitRepository;
//! use commitlens::pipeline::Pipeline;
//! use commitlens::LensConfig;
//! use std::sync::Arc;
//!
//! let repo = GitRepository::open_current().unwrap();
//! let report = Pipeline::new(LensConfig::default(), Arc::new(repo))
//!     .run("HEAD", "")
//!     .unwrap();
//!
//! if let Some(message) = report.commit_message() {
//!     println!("{}", message);
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod semantic;

pub use config::LensConfig;
pub use error::{LensError, Result};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of commitlens.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Version with the short commit hash and date when known.
    pub fn version_string() -> String {
        let short_sha = GIT_SHA.map(|sha| &sha[..7.min(sha.len())]);
        match (short_sha, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => format!("{} ({} {})", VERSION, sha, date),
            (Some(sha), None) => format!("{} ({})", VERSION, sha),
            _ => VERSION.to_string(),
        }
    }
}
