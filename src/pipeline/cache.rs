// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Content-addressed cache of semantic analysis results.
//!
//! Entries are keyed by revision pair, both paths of the change and a hash
//! of both images, so a stale entry can never be served for different content. With
//! `advanced.cache_results` the cache is loaded from and saved to a JSON file
//! per revision pair.

use crate::analysis::{ContentSnapshot, FileChange};
use crate::error::{Result, ResultExt};
use crate::semantic::SemanticDelta;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Cache format version; files with another version are ignored.
const CACHE_VERSION: u32 = 2;

/// Identity of one analyzed file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheKey {
    pub base: String,
    pub head: String,
    pub path: String,
    /// Pre-image path; differs from `path` for renames.
    pub base_path: String,
    pub content_hash: String,
}

impl CacheKey {
    pub fn new(base: &str, head: &str, change: &FileChange, content: &ContentSnapshot) -> Self {
        Self {
            base: base.to_string(),
            head: head.to_string(),
            path: change.path.clone(),
            base_path: change.base_path().to_string(),
            content_hash: content_hash(content),
        }
    }
}

/// Cached semantic result for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAnalysis {
    pub deltas: Vec<SemanticDelta>,
    pub affected_symbols: BTreeSet<String>,
}

impl CachedAnalysis {
    /// Wrap deltas, collecting the symbols they touch.
    pub fn from_deltas(deltas: Vec<SemanticDelta>) -> Self {
        let affected_symbols = deltas
            .iter()
            .filter_map(|d| d.affected_symbol.clone())
            .collect();
        Self {
            deltas,
            affected_symbols,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    key: CacheKey,
    value: CachedAnalysis,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFile {
    version: u32,
    saved_at: DateTime<Utc>,
    entries: Vec<CacheEntry>,
}

/// Concurrent result cache shared by the analysis workers.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<CacheKey, CachedAnalysis>,
    file: Option<PathBuf>,
}

impl ResultCache {
    /// A cache that lives for one run only.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the cache file for a revision pair under `dir`.
    ///
    /// A missing, unreadable or outdated file yields an empty cache.
    pub fn open(dir: &Path, base: &str, head: &str) -> Self {
        let file = dir.join(Self::file_name(base, head));
        let entries = DashMap::new();

        match load(&file) {
            Ok(Some(data)) if data.version == CACHE_VERSION => {
                tracing::debug!(
                    "Loaded {} cached results saved at {}",
                    data.entries.len(),
                    data.saved_at
                );
                for entry in data.entries {
                    entries.insert(entry.key, entry.value);
                }
            }
            Ok(Some(data)) => {
                tracing::debug!("Ignoring cache version {}", data.version);
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("Failed to load cache {}: {}", file.display(), e),
        }

        Self {
            entries,
            file: Some(file),
        }
    }

    /// Default cache directory: `<user cache dir>/commitlens`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("commitlens"))
    }

    /// `<sha256(base..head)>.json`
    pub fn file_name(base: &str, head: &str) -> String {
        let digest = Sha256::digest(format!("{}..{}", base, head).as_bytes());
        format!("{}.json", hex(&digest))
    }

    pub fn get(&self, key: &CacheKey) -> Option<CachedAnalysis> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store a result. The first writer for a key wins.
    pub fn insert(&self, key: CacheKey, value: CachedAnalysis) {
        self.entries.entry(key).or_insert(value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache file, if this cache has one.
    pub fn persist(&self) -> Result<()> {
        let Some(ref file) = self.file else {
            return Ok(());
        };

        let mut entries: Vec<CacheEntry> = self
            .entries
            .iter()
            .map(|entry| CacheEntry {
                key: entry.key().clone(),
                value: entry.value().clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        let data = CacheFile {
            version: CACHE_VERSION,
            saved_at: Utc::now(),
            entries,
        };

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).context("Failed to create cache directory")?;
        }
        let json = serde_json::to_string(&data).context("Failed to serialize cache")?;
        fs::write(file, json).context("Failed to write cache")?;

        tracing::debug!("Saved {} cached results to {}", data.entries.len(), file.display());
        Ok(())
    }
}

fn load(file: &Path) -> Result<Option<CacheFile>> {
    if !file.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(file).context("Failed to read cache")?;
    let data = serde_json::from_str(&text).context("Failed to parse cache")?;
    Ok(Some(data))
}

/// Hash of both images. Each side is length-prefixed so the boundary is
/// unambiguous; an absent side hashes differently from an empty one.
fn content_hash(content: &ContentSnapshot) -> String {
    let mut hasher = Sha256::new();
    for side in [&content.old, &content.new] {
        match side {
            Some(text) => {
                hasher.update([1u8]);
                hasher.update((text.len() as u64).to_le_bytes());
                hasher.update(text.as_bytes());
            }
            None => hasher.update([0u8]),
        }
    }
    hex(&hasher.finalize())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ChangeStatus;
    use crate::semantic::{DeltaType, Severity};
    use tempfile::TempDir;

    fn snapshot(old: &str, new: &str) -> ContentSnapshot {
        ContentSnapshot {
            old: Some(old.to_string()),
            new: Some(new.to_string()),
        }
    }

    fn analysis() -> CachedAnalysis {
        CachedAnalysis::from_deltas(vec![SemanticDelta::file(
            DeltaType::FileAdded,
            Severity::Low,
            "add a.ts",
        )])
    }

    #[test]
    fn test_content_hash_boundaries() {
        assert_ne!(content_hash(&snapshot("ab", "c")), content_hash(&snapshot("a", "bc")));
        let absent = ContentSnapshot {
            old: None,
            new: Some(String::new()),
        };
        assert_ne!(content_hash(&absent), content_hash(&snapshot("", "")));
    }

    #[test]
    fn test_rename_source_is_part_of_key() {
        let content = snapshot("x", "y");
        let edited = CacheKey::new("HEAD", "", &FileChange::new("src/b.ts", ChangeStatus::Modified), &content);
        let from_a = CacheKey::new("HEAD", "", &FileChange::renamed("src/a.ts", "src/b.ts"), &content);
        let from_c = CacheKey::new("HEAD", "", &FileChange::renamed("src/c.ts", "src/b.ts"), &content);
        assert_eq!(from_a.base_path, "src/a.ts");
        assert_ne!(from_a, from_c);
        assert_ne!(from_a, edited);

        let cache = ResultCache::in_memory();
        cache.insert(from_a, analysis());
        assert!(cache.get(&from_c).is_none());
    }

    #[test]
    fn test_first_writer_wins() {
        let cache = ResultCache::in_memory();
        let key = CacheKey::new("a", "b", &FileChange::new("src/a.ts", ChangeStatus::Modified), &snapshot("x", "y"));
        cache.insert(key.clone(), analysis());
        cache.insert(key.clone(), CachedAnalysis::from_deltas(vec![]));
        assert_eq!(cache.get(&key), Some(analysis()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let key = CacheKey::new("main", "HEAD", &FileChange::new("src/a.ts", ChangeStatus::Modified), &snapshot("x", "y"));

        let cache = ResultCache::open(dir.path(), "main", "HEAD");
        assert!(cache.is_empty());
        cache.insert(key.clone(), analysis());
        cache.persist().unwrap();

        let file = dir.path().join(ResultCache::file_name("main", "HEAD"));
        assert!(file.exists());

        let reloaded = ResultCache::open(dir.path(), "main", "HEAD");
        assert_eq!(reloaded.get(&key), Some(analysis()));

        let other = ResultCache::open(dir.path(), "main", "dev");
        assert!(other.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ResultCache::file_name("a", "b")), "{not json").unwrap();
        let cache = ResultCache::open(dir.path(), "a", "b");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_file_name_is_stable() {
        let name = ResultCache::file_name("main", "HEAD");
        assert_eq!(name, ResultCache::file_name("main", "HEAD"));
        assert_eq!(name.len(), 64 + ".json".len());
    }
}
