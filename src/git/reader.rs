// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Version-control read interface consumed by the pipeline.

use crate::error::Result;

/// Revision string that denotes the working tree.
pub const WORKING_TREE: &str = "";

/// Read-only access to a repository.
///
/// Implementations must be safe to share across the analysis thread pool.
pub trait VcsReader: Send + Sync {
    /// Name-status diff between two revisions, one entry per line:
    /// `<status>\t<path>` or `R<score>\t<old>\t<new>`.
    fn name_status(&self, base: &str, head: &str) -> Result<String>;

    /// File content at a revision, `Ok(None)` when the file does not exist there.
    fn read_file(&self, revision: &str, path: &str) -> Result<Option<Vec<u8>>>;

    /// Stable identifier for a revision, used in cache keys.
    fn resolve(&self, revision: &str) -> Result<String>;

    /// Whether a file exists at a revision. Read errors count as absent.
    fn exists(&self, revision: &str, path: &str) -> bool {
        matches!(self.read_file(revision, path), Ok(Some(_)))
    }
}
