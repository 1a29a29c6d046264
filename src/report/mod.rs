// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Report synthesis: per-type summary, primary type and suggested commit.

mod render;

pub use render::{render, render_json, render_markdown, render_text};

use crate::analysis::{AnalysisWarning, Stage};
use crate::commit::CommitMessage;
use crate::config::CommitType;
use crate::scoring::ScoredChange;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Directory names too generic to serve as a scope.
const GENERIC_SCOPES: &[&str] = &["src", "lib"];

/// Inputs to report synthesis beyond the scored changes.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub base: String,
    pub head: String,
    /// Maximum bullet points in the commit body.
    pub max_body_items: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            base: String::new(),
            head: String::new(),
            max_body_items: 5,
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub base: String,
    pub head: String,
    pub complete: bool,
    pub stages_completed: Vec<Stage>,
    /// Scored records, in detection order.
    pub files_analyzed: Vec<ScoredChange>,
    pub summary: BTreeMap<CommitType, usize>,
    pub primary_type: CommitType,
    pub has_breaking_changes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_commit: Option<CommitMessage>,
    pub warnings: Vec<AnalysisWarning>,
    pub degraded_files: Vec<String>,
}

impl Report {
    /// Report of a cancelled run: no records and no suggestion.
    pub fn partial(base: &str, head: &str, stages_completed: Vec<Stage>) -> Self {
        Self {
            base: base.to_string(),
            head: head.to_string(),
            complete: false,
            stages_completed,
            files_analyzed: Vec::new(),
            summary: BTreeMap::new(),
            primary_type: CommitType::Chore,
            has_breaking_changes: false,
            suggested_commit: None,
            warnings: Vec::new(),
            degraded_files: Vec::new(),
        }
    }

    /// Formatted suggested commit message, if any.
    pub fn commit_message(&self) -> Option<String> {
        self.suggested_commit.as_ref().map(CommitMessage::format)
    }
}

/// Aggregates scored changes into a [`Report`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// Build the report of a completed run. Never fails.
    pub fn generate_report(&self, scored: Vec<ScoredChange>, options: &ReportOptions) -> Report {
        let mut summary: BTreeMap<CommitType, usize> = BTreeMap::new();
        for change in &scored {
            *summary.entry(change.classified.commit_type).or_insert(0) += 1;
        }

        let primary_type = primary_type(&scored);
        let has_breaking_changes = scored.iter().any(|c| c.classified.breaking);

        let warnings: Vec<AnalysisWarning> = scored
            .iter()
            .flat_map(|c| c.classified.semantic.all_warnings().cloned())
            .collect();
        let degraded_files = scored
            .iter()
            .filter(|c| c.classified.semantic.is_degraded())
            .map(|c| c.path().to_string())
            .collect();

        let suggested_commit = suggest_commit(&scored, primary_type, has_breaking_changes, options);
        tracing::debug!(
            "Analyzed {} files: primary type {}{}",
            scored.len(),
            primary_type,
            if has_breaking_changes { ", breaking" } else { "" }
        );

        Report {
            base: options.base.clone(),
            head: options.head.clone(),
            complete: true,
            stages_completed: Stage::all().to_vec(),
            summary,
            primary_type,
            has_breaking_changes,
            suggested_commit: Some(suggested_commit),
            warnings,
            degraded_files,
            files_analyzed: scored,
        }
    }
}

/// Type with the highest combined score; ties by count, then type priority.
fn primary_type(scored: &[ScoredChange]) -> CommitType {
    let mut groups: BTreeMap<CommitType, (f64, usize)> = BTreeMap::new();
    for change in scored {
        let entry = groups.entry(change.classified.commit_type).or_insert((0.0, 0));
        entry.0 += change.score;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .max_by(|(type_a, (score_a, count_a)), (type_b, (score_b, count_b))| {
            score_a
                .total_cmp(score_b)
                .then(count_a.cmp(count_b))
                // Lower ordinal means higher priority.
                .then(type_b.cmp(type_a))
        })
        .map(|(commit_type, _)| commit_type)
        .unwrap_or(CommitType::Chore)
}

/// Members of a group, highest score first; ties keep detector order.
fn ranked(scored: &[ScoredChange], commit_type: CommitType) -> Vec<&ScoredChange> {
    let mut group: Vec<&ScoredChange> = scored
        .iter()
        .filter(|c| c.classified.commit_type == commit_type)
        .collect();
    group.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    group
}

fn suggest_commit(
    scored: &[ScoredChange],
    primary_type: CommitType,
    breaking: bool,
    options: &ReportOptions,
) -> CommitMessage {
    let group = ranked(scored, primary_type);

    let Some(lead) = group.first() else {
        return CommitMessage::new(CommitType::Chore, "no changes");
    };

    let scope = lead
        .classified
        .commit_scope
        .clone()
        .or_else(|| directory_scope(group.iter().map(|c| c.path())));

    let body: Vec<String> = group
        .iter()
        .skip(1)
        .take(options.max_body_items)
        .map(|c| format!("- {}", c.classified.description))
        .collect();

    let footer = scored
        .iter()
        .find(|c| c.classified.breaking)
        .and_then(|c| c.classified.breaking_change_reason.as_ref())
        .map(|reason| format!("BREAKING CHANGE: {}", reason))
        .unwrap_or_default();

    CommitMessage::new(primary_type, &lead.classified.description)
        .with_scope(scope)
        .with_breaking(breaking)
        .with_body(body.join("\n"))
        .with_footer(footer)
}

/// Last component of the common directory prefix, unless generic.
fn directory_scope<'a>(paths: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut common: Option<Vec<&str>> = None;
    for path in paths {
        let mut dirs: Vec<&str> = path.split('/').collect();
        dirs.pop();
        common = Some(match common {
            None => dirs,
            Some(prefix) => prefix
                .iter()
                .zip(dirs.iter())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| *a)
                .collect(),
        });
    }

    let last = common?.last().copied()?;
    if GENERIC_SCOPES.contains(&last) {
        return None;
    }
    Some(last.to_string())
}

/// Commit types present in a report, most frequent first.
pub fn types_by_count(report: &Report) -> Vec<(CommitType, usize)> {
    let mut types: Vec<(CommitType, usize)> = report.summary.iter().map(|(t, n)| (*t, *n)).collect();
    types.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    types
}

/// Distinct paths that carry at least one warning.
pub fn warned_paths(report: &Report) -> BTreeSet<&str> {
    report.warnings.iter().map(|w| w.path.as_str()).collect()
}
