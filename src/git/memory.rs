// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! In-memory repository for library consumers and tests.

use crate::error::{GitError, LensError, Result};
use std::collections::{BTreeMap, BTreeSet};

use super::diff::{render_name_status, NameStatusEntry};
use super::reader::{VcsReader, WORKING_TREE};

type Snapshot = BTreeMap<String, Vec<u8>>;

/// A [`VcsReader`] over named snapshots held in memory.
///
/// Name-status output lists paths in lexical order. A deleted and an added
/// file with identical content are reported as a rename.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    revisions: BTreeMap<String, Snapshot>,
    name_status_overrides: BTreeMap<(String, String), String>,
    unreadable: BTreeSet<String>,
    unavailable: bool,
}

impl InMemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a revision with no files.
    pub fn with_revision(mut self, revision: &str) -> Self {
        self.revisions.entry(revision.to_string()).or_default();
        self
    }

    /// Add a file to a revision, creating the revision if needed.
    pub fn with_file(mut self, revision: &str, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.revisions
            .entry(revision.to_string())
            .or_default()
            .insert(path.to_string(), content.as_ref().to_vec());
        self
    }

    /// Copy every file of `from` into a new revision `to`.
    pub fn with_copy(mut self, from: &str, to: &str) -> Self {
        let snapshot = self.revisions.get(from).cloned().unwrap_or_default();
        self.revisions.insert(to.to_string(), snapshot);
        self
    }

    /// Remove a file from a revision.
    pub fn without_file(mut self, revision: &str, path: &str) -> Self {
        if let Some(snapshot) = self.revisions.get_mut(revision) {
            snapshot.remove(path);
        }
        self
    }

    /// Serve a fixed name-status text for a revision pair.
    pub fn with_name_status(mut self, base: &str, head: &str, text: &str) -> Self {
        self.name_status_overrides
            .insert((base.to_string(), head.to_string()), text.to_string());
        self
    }

    /// Make reads of `path` fail at every revision.
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(path.to_string());
        self
    }

    /// Make every query fail as if the repository were gone.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(LensError::Git(GitError::Unavailable {
                message: "repository unavailable".to_string(),
            }));
        }
        Ok(())
    }

    fn snapshot(&self, revision: &str) -> Result<Snapshot> {
        match self.revisions.get(revision) {
            Some(snapshot) => Ok(snapshot.clone()),
            // An unregistered working tree is empty.
            None if revision == WORKING_TREE => Ok(Snapshot::new()),
            None => Err(LensError::Git(GitError::InvalidRevision {
                revision: revision.to_string(),
                message: "unknown revision".to_string(),
            })),
        }
    }
}

impl VcsReader for InMemoryRepository {
    fn name_status(&self, base: &str, head: &str) -> Result<String> {
        self.check_available()?;
        let old = self.snapshot(base)?;
        let new = self.snapshot(head)?;

        if let Some(text) = self
            .name_status_overrides
            .get(&(base.to_string(), head.to_string()))
        {
            return Ok(text.clone());
        }

        let mut added: Vec<&String> = new.keys().filter(|p| !old.contains_key(*p)).collect();

        let mut entries = Vec::new();
        for path in old.keys().chain(added.iter().copied()).collect::<BTreeSet<_>>() {
            match (old.get(path), new.get(path)) {
                (Some(before), Some(after)) if before != after => entries.push(NameStatusEntry {
                    status: "M".to_string(),
                    old_path: None,
                    path: path.clone(),
                }),
                (Some(before), None) => {
                    let renamed_to = added
                        .iter()
                        .position(|candidate| new.get(*candidate) == Some(before));
                    match renamed_to {
                        Some(index) => {
                            let target = added.remove(index);
                            entries.push(NameStatusEntry {
                                status: "R100".to_string(),
                                old_path: Some(path.clone()),
                                path: target.clone(),
                            });
                        }
                        None => entries.push(NameStatusEntry {
                            status: "D".to_string(),
                            old_path: None,
                            path: path.clone(),
                        }),
                    }
                }
                _ => {}
            }
        }

        // Whatever was not consumed by a rename is a plain addition.
        for path in added {
            entries.push(NameStatusEntry {
                status: "A".to_string(),
                old_path: None,
                path: path.clone(),
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!("{} entries between '{}' and '{}'", entries.len(), base, head);
        Ok(render_name_status(&entries))
    }

    fn read_file(&self, revision: &str, path: &str) -> Result<Option<Vec<u8>>> {
        self.check_available()?;
        if self.unreadable.contains(path) {
            return Err(LensError::Git(GitError::ReadFailed {
                path: path.to_string(),
                revision: revision.to_string(),
                message: "permission denied".to_string(),
            }));
        }
        Ok(self.snapshot(revision)?.get(path).cloned())
    }

    fn resolve(&self, revision: &str) -> Result<String> {
        self.check_available()?;
        self.snapshot(revision)?;
        Ok(revision.to_string())
    }
}
