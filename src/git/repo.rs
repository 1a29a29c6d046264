// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Repository operations.

use crate::error::{GitError, LensError, Result};
use git2::{DiffFindOptions, DiffOptions, ErrorCode, Repository as Git2Repo};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::diff::{entries_from_diff, render_name_status};
use super::reader::{VcsReader, WORKING_TREE};

/// git2-backed implementation of [`VcsReader`].
///
/// `git2::Repository` is not `Sync`, so access goes through a mutex; only
/// object lookups are serialized, parsing still runs in parallel.
pub struct GitRepository {
    inner: Mutex<Git2Repo>,
    workdir: PathBuf,
}

impl GitRepository {
    /// Open a repository from the current directory.
    pub fn open_current() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            LensError::Git(GitError::Unavailable {
                message: format!("Failed to get current directory: {}", e),
            })
        })?;
        Self::open(&current_dir)
    }

    /// Open a repository from a path.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                LensError::Git(GitError::Unavailable {
                    message: format!("Not a git repository: {}", path.display()),
                })
            } else {
                LensError::Git(GitError::Unavailable {
                    message: e.message().to_string(),
                })
            }
        })?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| {
                LensError::Git(GitError::Unavailable {
                    message: "Repository has no working directory (bare repository)".to_string(),
                })
            })?
            .to_path_buf();

        Ok(Self {
            inner: Mutex::new(repo),
            workdir,
        })
    }

    /// Get the working directory path.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Git2Repo>> {
        self.inner.lock().map_err(|_| {
            LensError::Git(GitError::Unavailable {
                message: "repository handle poisoned".to_string(),
            })
        })
    }

    fn read_workdir_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        match std::fs::read(self.workdir.join(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LensError::Git(GitError::ReadFailed {
                path: path.to_string(),
                revision: WORKING_TREE.to_string(),
                message: e.to_string(),
            })),
        }
    }
}

/// Resolve a revision to its tree.
fn resolve_tree<'r>(repo: &'r Git2Repo, revision: &str) -> Result<git2::Tree<'r>> {
    let invalid = |e: git2::Error| {
        LensError::Git(GitError::InvalidRevision {
            revision: revision.to_string(),
            message: e.message().to_string(),
        })
    };

    repo.revparse_single(revision)
        .map_err(invalid)?
        .peel_to_tree()
        .map_err(invalid)
}

impl VcsReader for GitRepository {
    fn name_status(&self, base: &str, head: &str) -> Result<String> {
        let repo = self.lock()?;

        let base_tree = if base == WORKING_TREE {
            None
        } else {
            Some(resolve_tree(&repo, base)?)
        };

        let mut opts = DiffOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);

        let diff_failed = |e: git2::Error| {
            LensError::Git(GitError::DiffFailed {
                message: e.message().to_string(),
            })
        };

        let mut diff = if head == WORKING_TREE {
            repo.diff_tree_to_workdir_with_index(base_tree.as_ref(), Some(&mut opts))
                .map_err(diff_failed)?
        } else {
            let head_tree = resolve_tree(&repo, head)?;
            repo.diff_tree_to_tree(base_tree.as_ref(), Some(&head_tree), Some(&mut opts))
                .map_err(diff_failed)?
        };

        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find)).map_err(diff_failed)?;

        let entries = entries_from_diff(&diff)?;
        tracing::debug!("{} entries between '{}' and '{}'", entries.len(), base, head);
        Ok(render_name_status(&entries))
    }

    fn read_file(&self, revision: &str, path: &str) -> Result<Option<Vec<u8>>> {
        if revision == WORKING_TREE {
            return self.read_workdir_file(path);
        }

        let repo = self.lock()?;
        let tree = resolve_tree(&repo, revision)?;

        let read_failed = |e: git2::Error| {
            LensError::Git(GitError::ReadFailed {
                path: path.to_string(),
                revision: revision.to_string(),
                message: e.message().to_string(),
            })
        };

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(read_failed(e)),
        };

        let blob = entry
            .to_object(&repo)
            .and_then(|obj| obj.peel_to_blob())
            .map_err(read_failed)?;

        Ok(Some(blob.content().to_vec()))
    }

    fn resolve(&self, revision: &str) -> Result<String> {
        if revision == WORKING_TREE {
            return Ok(WORKING_TREE.to_string());
        }

        let repo = self.lock()?;
        let object = repo.revparse_single(revision).map_err(|e| {
            LensError::Git(GitError::InvalidRevision {
                revision: revision.to_string(),
                message: e.message().to_string(),
            })
        })?;
        Ok(object.id().to_string())
    }
}
