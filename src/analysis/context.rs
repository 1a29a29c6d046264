// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Context correlation: content snapshots, line counts and import graph.

use crate::error::AnalysisError;
use crate::git::VcsReader;
use crate::pipeline::PipelineContext;
use similar::{ChangeTag, TextDiff};
use std::collections::{HashSet, VecDeque};

use super::change::{ChangeMetadata, ChangeStatus, ContentSnapshot, ContextualizedChange, FileChange};
use super::imports::import_candidates;
use super::language::FileType;
use super::warnings::{AnalysisWarning, Stage, WarningKind};

/// Bytes inspected when sniffing for binary content.
const BINARY_SNIFF_LEN: usize = 8000;

/// Content of one side of a change.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Absent,
    Text(String),
    Binary,
    Unreadable(String),
}

impl Content {
    fn from_bytes(bytes: Vec<u8>) -> Self {
        let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
        if sniff.contains(&0) {
            return Content::Binary;
        }
        match String::from_utf8(bytes) {
            Ok(text) => Content::Text(text),
            Err(_) => Content::Binary,
        }
    }

    fn text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Attaches related-file and dependency context to each change.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextCorrelator;

impl ContextCorrelator {
    /// Create a correlator.
    pub fn new() -> Self {
        Self
    }

    /// Correlate every change. Never fails on a single file.
    pub fn correlate(&self, changes: Vec<FileChange>, ctx: &PipelineContext) -> Vec<ContextualizedChange> {
        let change_set: HashSet<String> = changes.iter().map(|c| c.path.clone()).collect();

        let records = ctx.map_files(changes, |_, change| {
            self.correlate_one(change, &change_set, ctx)
        });
        tracing::debug!("Correlated {} files", records.len());
        records
    }

    fn correlate_one(
        &self,
        change: FileChange,
        change_set: &HashSet<String>,
        ctx: &PipelineContext,
    ) -> ContextualizedChange {
        let reader = ctx.reader.as_ref();
        let file_type = FileType::from_path(&change.path);

        let old = match change.status {
            ChangeStatus::Added => Content::Absent,
            _ => load(reader, &ctx.base, change.base_path()),
        };
        let new = match change.status {
            ChangeStatus::Deleted => Content::Absent,
            _ => load(reader, &ctx.head, &change.path),
        };

        let mut warnings = Vec::new();
        for content in [&old, &new] {
            match content {
                Content::Unreadable(message) => {
                    let error = AnalysisError::FileRead {
                        path: change.path.clone(),
                        message: message.clone(),
                    };
                    warnings.push(AnalysisWarning::from_error(Stage::Correlate, &error));
                }
                Content::Binary => warnings.push(AnalysisWarning::new(
                    &change.path,
                    Stage::Correlate,
                    WarningKind::Binary,
                    "binary content",
                )),
                _ => {}
            }
        }
        warnings.dedup_by(|a, b| a.kind == b.kind);

        let (lines_added, lines_removed) = if warnings.is_empty() {
            count_lines(old.text().unwrap_or(""), new.text().unwrap_or(""))
        } else {
            (0, 0)
        };

        let related_files = if warnings.is_empty() {
            // Deleted files are traversed at the base revision.
            let (revision, content) = match change.status {
                ChangeStatus::Deleted => (ctx.base.as_str(), old.text()),
                _ => (ctx.head.as_str(), new.text()),
            };
            match content {
                Some(content) => related_files(
                    reader,
                    revision,
                    &change.path,
                    content,
                    ctx.config.analysis.context_depth,
                ),
                None => Vec::new(),
            }
        } else {
            Vec::new()
        };

        let dependencies = related_files
            .iter()
            .filter(|path| change_set.contains(*path))
            .cloned()
            .collect();

        tracing::debug!(
            "{}: +{} -{}, {} related",
            change.path,
            lines_added,
            lines_removed,
            related_files.len()
        );

        ContextualizedChange {
            change,
            related_files,
            dependencies,
            metadata: ChangeMetadata {
                lines_added,
                lines_removed,
                file_type,
            },
            warnings,
            content: ContentSnapshot {
                old: old.into_text(),
                new: new.into_text(),
            },
        }
    }
}

fn load(reader: &dyn VcsReader, revision: &str, path: &str) -> Content {
    match reader.read_file(revision, path) {
        Ok(Some(bytes)) => Content::from_bytes(bytes),
        Ok(None) => Content::Absent,
        Err(e) => Content::Unreadable(e.to_string()),
    }
}

/// Count inserted and deleted lines.
pub fn count_lines(old: &str, new: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(old, new);
    let mut added = 0;
    let mut removed = 0;

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }

    (added, removed)
}

/// Breadth-first walk of static imports up to `max_depth` hops.
fn related_files(
    reader: &dyn VcsReader,
    revision: &str,
    path: &str,
    content: &str,
    max_depth: usize,
) -> Vec<String> {
    let mut related = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(path.to_string());

    let mut queue: VecDeque<(String, String, usize)> = VecDeque::new();
    queue.push_back((path.to_string(), content.to_string(), 0));

    while let Some((file, text, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for candidates in import_candidates(&file, FileType::from_path(&file), &text) {
            let Some(target) = candidates
                .into_iter()
                .find(|candidate| reader.exists(revision, candidate))
            else {
                continue;
            };

            if !visited.insert(target.clone()) {
                continue;
            }
            related.push(target.clone());

            if depth + 1 < max_depth {
                if let Content::Text(next) = load(reader, revision, &target) {
                    queue.push_back((target, next, depth + 1));
                }
            }
        }
    }

    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LensConfig;
    use crate::git::InMemoryRepository;
    use crate::rules::RuleSet;
    use std::sync::Arc;

    fn context(repo: InMemoryRepository, depth: usize) -> PipelineContext {
        let mut config = LensConfig::default();
        config.analysis.context_depth = depth;
        let rules = RuleSet::from_config(&config.rules).unwrap();
        PipelineContext::new(config, rules, Arc::new(repo), "base", "head").unwrap()
    }

    fn graph_repo() -> InMemoryRepository {
        InMemoryRepository::new()
            .with_file("base", "src/api.ts", "import { b } from './b';\nexport function api() {}\n")
            .with_file("base", "src/b.ts", "import { c } from './c';\nexport const b = 1;\n")
            .with_file("base", "src/c.ts", "import { d } from './d';\nexport const c = 1;\n")
            .with_file("base", "src/d.ts", "export const d = 1;\n")
            .with_copy("base", "head")
            .with_file(
                "head",
                "src/api.ts",
                "import { b } from './b';\nexport function api(id: string) {}\n",
            )
            .with_file("head", "src/b.ts", "import { c } from './c';\nexport const b = 2;\n")
    }

    #[test]
    fn test_related_files_respect_depth() {
        let ctx = context(graph_repo(), 2);
        let changes = vec![FileChange::new("src/api.ts", ChangeStatus::Modified)];
        let records = ContextCorrelator::new().correlate(changes, &ctx);

        assert_eq!(records[0].related_files, vec!["src/b.ts", "src/c.ts"]);
        assert!(records[0].dependencies.is_empty());
    }

    #[test]
    fn test_dependencies_are_in_change_set() {
        let ctx = context(graph_repo(), 3);
        let changes = vec![
            FileChange::new("src/api.ts", ChangeStatus::Modified),
            FileChange::new("src/b.ts", ChangeStatus::Modified),
        ];
        let records = ContextCorrelator::new().correlate(changes, &ctx);

        assert_eq!(records[0].related_files, vec!["src/b.ts", "src/c.ts", "src/d.ts"]);
        assert_eq!(records[0].dependencies, vec!["src/b.ts"]);
        assert_eq!(records[1].related_files, vec!["src/c.ts", "src/d.ts"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let repo = InMemoryRepository::new()
            .with_file("base", "a.js", "const b = require('./b');\n")
            .with_file("base", "b.js", "const a = require('./a');\n")
            .with_copy("base", "head")
            .with_file("head", "a.js", "const b = require('./b');\nmodule.exports = b;\n");
        let ctx = context(repo, 10);
        let changes = vec![FileChange::new("a.js", ChangeStatus::Modified)];
        let records = ContextCorrelator::new().correlate(changes, &ctx);

        assert_eq!(records[0].related_files, vec!["b.js"]);
    }

    #[test]
    fn test_line_counts() {
        let ctx = context(graph_repo(), 0);
        let changes = vec![FileChange::new("src/api.ts", ChangeStatus::Modified)];
        let records = ContextCorrelator::new().correlate(changes, &ctx);

        assert_eq!(records[0].metadata.lines_added, 1);
        assert_eq!(records[0].metadata.lines_removed, 1);
        assert_eq!(records[0].metadata.file_type, FileType::TypeScript);
        assert!(records[0].related_files.is_empty());
        assert!(records[0].content.old.is_some());
    }

    #[test]
    fn test_added_and_deleted() {
        let repo = InMemoryRepository::new()
            .with_file("base", "gone.rs", "fn a() {}\nfn b() {}\n")
            .with_file("head", "new.rs", "fn c() {}\n");
        let ctx = context(repo, 2);
        let changes = vec![
            FileChange::new("gone.rs", ChangeStatus::Deleted),
            FileChange::new("new.rs", ChangeStatus::Added),
        ];
        let records = ContextCorrelator::new().correlate(changes, &ctx);

        assert_eq!(records[0].metadata.lines_removed, 2);
        assert_eq!(records[0].metadata.lines_added, 0);
        assert!(records[0].content.new.is_none());
        assert_eq!(records[1].metadata.lines_added, 1);
        assert!(records[1].content.old.is_none());
    }

    #[test]
    fn test_binary_content() {
        let repo = InMemoryRepository::new()
            .with_file("base", "logo.png", [0x89u8, b'P', b'N', b'G', 0, 1, 2])
            .with_file("head", "logo.png", [0x89u8, b'P', b'N', b'G', 0, 3, 4]);
        let ctx = context(repo, 2);
        let changes = vec![FileChange::new("logo.png", ChangeStatus::Modified)];
        let records = ContextCorrelator::new().correlate(changes, &ctx);

        assert_eq!(records[0].warnings.len(), 1);
        assert_eq!(records[0].warnings[0].kind, WarningKind::Binary);
        assert!(!records[0].warnings[0].kind.is_degrading());
        assert_eq!(records[0].metadata.lines_added, 0);
        assert!(!records[0].content.has_text());
    }

    #[test]
    fn test_unreadable_content() {
        let repo = graph_repo().with_unreadable("src/api.ts");
        let ctx = context(repo, 2);
        let changes = vec![FileChange::new("src/api.ts", ChangeStatus::Modified)];
        let records = ContextCorrelator::new().correlate(changes, &ctx);

        assert_eq!(records[0].warnings.len(), 1);
        assert_eq!(records[0].warnings[0].kind, WarningKind::FileRead);
        assert_eq!(records[0].warnings[0].stage, Stage::Correlate);
        assert!(records[0].related_files.is_empty());
        assert!(records[0].dependencies.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        assert_eq!(Content::from_bytes(vec![0xff, 0xfe, b'a']), Content::Binary);
        assert_eq!(
            Content::from_bytes(b"hello".to_vec()),
            Content::Text("hello".to_string())
        );
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines("", "a\nb\n"), (2, 0));
        assert_eq!(count_lines("a\nb\n", "a\nc\n"), (1, 1));
        assert_eq!(count_lines("same\n", "same\n"), (0, 0));
    }
}
