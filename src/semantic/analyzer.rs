// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Structural diffing of the two images of each change.

use crate::analysis::{AnalysisWarning, ChangeStatus, ContextualizedChange, Stage, WarningKind};
use crate::error::AnalysisError;
use crate::pipeline::{CacheKey, CachedAnalysis, PipelineContext};
use std::collections::{HashMap, HashSet};

use super::delta::{DeltaType, SemanticChange, SemanticDelta, Severity};
use super::source::Deadline;
use super::symbols::{extract_symbols, Symbol};

/// Turns contextualized changes into symbol-level deltas.
#[derive(Debug, Default, Clone, Copy)]
pub struct SemanticAnalyzer {
    deadline: Option<Deadline>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every file against `deadline` instead of a fresh
    /// `analysis.file_analysis_timeout` per file.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Analyze every change. Never fails on a single file.
    pub fn analyze(&self, changes: Vec<ContextualizedChange>, ctx: &PipelineContext) -> Vec<SemanticChange> {
        let records = ctx.map_files(changes, |index, change| self.analyze_one(index, change, ctx));
        tracing::debug!("Analyzed {} files", records.len());
        records
    }

    fn analyze_one(&self, index: usize, change: ContextualizedChange, ctx: &PipelineContext) -> SemanticChange {
        let mut warnings = Vec::new();
        let limit = ctx.config.analysis.max_files_to_analyze;
        let over_limit = index >= limit;
        if over_limit {
            warnings.push(AnalysisWarning::new(
                change.path(),
                Stage::Analyze,
                WarningKind::LimitExceeded,
                format!("beyond the first {} files, structure not analyzed", limit),
            ));
        }

        let parseable = !over_limit
            && change.metadata.file_type.is_parseable()
            && change.warnings.is_empty();

        let analysis = if parseable {
            match self.structural_deltas(&change, ctx) {
                Ok(analysis) => analysis,
                Err(error) => {
                    warnings.push(AnalysisWarning::from_error(Stage::Analyze, &error));
                    CachedAnalysis::from_deltas(vec![SemanticDelta::non_code(change.change.file_name())])
                }
            }
        } else {
            CachedAnalysis::from_deltas(file_level_deltas(&change))
        };

        let CachedAnalysis {
            deltas,
            affected_symbols,
        } = analysis;
        tracing::debug!("{}: {} deltas", change.path(), deltas.len());

        SemanticChange {
            context: change,
            semantic_changes: deltas,
            affected_symbols,
            warnings,
        }
    }

    /// Deltas of a parseable file, served from the cache when possible.
    fn structural_deltas(
        &self,
        change: &ContextualizedChange,
        ctx: &PipelineContext,
    ) -> Result<CachedAnalysis, AnalysisError> {
        let key = ctx
            .cache
            .as_ref()
            .map(|_| CacheKey::new(&ctx.base, &ctx.head, &change.change, &change.content));

        if let (Some(cache), Some(key)) = (ctx.cache.as_ref(), key.as_ref()) {
            if let Some(hit) = cache.get(key) {
                tracing::debug!("{}: cache hit", change.path());
                return Ok(hit);
            }
        }

        let deadline = self
            .deadline
            .unwrap_or_else(|| Deadline::after_ms(ctx.config.analysis.file_analysis_timeout));
        let analysis = CachedAnalysis::from_deltas(diff_change(change, &deadline)?);

        if let (Some(cache), Some(key)) = (ctx.cache.as_ref(), key) {
            cache.insert(key, analysis.clone());
        }

        Ok(analysis)
    }
}

/// Deltas that need no parsing: status rules, else a non-code change.
fn file_level_deltas(change: &ContextualizedChange) -> Vec<SemanticDelta> {
    let name = change.change.file_name();
    match change.change.status {
        ChangeStatus::Added => vec![SemanticDelta::file(
            DeltaType::FileAdded,
            Severity::Low,
            format!("add {}", name),
        )],
        ChangeStatus::Deleted => vec![file_deleted(change)],
        ChangeStatus::Renamed if same_content(change) => vec![file_renamed(change)],
        ChangeStatus::Renamed => vec![file_renamed(change), SemanticDelta::non_code(name)],
        ChangeStatus::Modified => vec![SemanticDelta::non_code(name)],
    }
}

fn diff_change(change: &ContextualizedChange, deadline: &Deadline) -> Result<Vec<SemanticDelta>, AnalysisError> {
    let path = change.path();
    let file_type = change.metadata.file_type;
    let parse = |content: &Option<String>, path: &str| match content {
        Some(text) => extract_symbols(path, file_type, text, deadline),
        None => Ok(Vec::new()),
    };

    match change.change.status {
        ChangeStatus::Added => {
            let symbols = parse(&change.content.new, path)?;
            let severity = if symbols.iter().any(|s| s.exported) {
                Severity::Medium
            } else {
                Severity::Low
            };
            Ok(vec![SemanticDelta::file(
                DeltaType::FileAdded,
                severity,
                format!("add {}", change.change.file_name()),
            )])
        }
        ChangeStatus::Deleted => Ok(vec![file_deleted(change)]),
        ChangeStatus::Renamed if same_content(change) => Ok(vec![file_renamed(change)]),
        ChangeStatus::Renamed | ChangeStatus::Modified => {
            let old = parse(&change.content.old, change.change.base_path())?;
            let new = parse(&change.content.new, path)?;
            let mut deltas = Vec::new();
            if change.change.status == ChangeStatus::Renamed {
                deltas.push(file_renamed(change));
            }
            deltas.extend(diff_symbols(&old, &new));
            Ok(deltas)
        }
    }
}

fn file_deleted(change: &ContextualizedChange) -> SemanticDelta {
    SemanticDelta::file(
        DeltaType::FileDeleted,
        Severity::Medium,
        format!("remove {}", change.change.file_name()),
    )
}

fn file_renamed(change: &ContextualizedChange) -> SemanticDelta {
    SemanticDelta::file(
        DeltaType::FileRenamed,
        Severity::Low,
        format!("rename {} to {}", change.change.base_path(), change.path()),
    )
}

fn same_content(change: &ContextualizedChange) -> bool {
    change.content.old == change.content.new
}

/// Diff two symbol tables by name.
///
/// Deltas come in a fixed order: removals, renames and in-place changes in
/// pre-image order, then additions in post-image order.
pub fn diff_symbols(old: &[Symbol], new: &[Symbol]) -> Vec<SemanticDelta> {
    let old_by_name: HashMap<&str, &Symbol> = old.iter().map(|s| (s.name.as_str(), s)).collect();
    let new_by_name: HashMap<&str, &Symbol> = new.iter().map(|s| (s.name.as_str(), s)).collect();

    let added: Vec<&Symbol> = new
        .iter()
        .filter(|s| !old_by_name.contains_key(s.name.as_str()))
        .collect();

    // Pair removed symbols with structurally identical added ones.
    let mut paired: HashSet<&str> = HashSet::new();
    let mut renames: HashMap<&str, &Symbol> = HashMap::new();
    for before in old.iter().filter(|s| !new_by_name.contains_key(s.name.as_str())) {
        let candidate = added.iter().copied().find(|after| {
            !paired.contains(after.name.as_str())
                && after.kind == before.kind
                && after.same_signature(before)
                && after.members == before.members
        });
        if let Some(after) = candidate {
            paired.insert(after.name.as_str());
            renames.insert(before.name.as_str(), after);
        }
    }

    let mut deltas = Vec::new();
    for before in old {
        match new_by_name.get(before.name.as_str()) {
            Some(after) => deltas.extend(diff_symbol(before, after)),
            None => match renames.get(before.name.as_str()) {
                Some(after) => deltas.push(SemanticDelta::symbol(
                    DeltaType::SymbolRenamed,
                    if before.exported { Severity::High } else { Severity::Low },
                    format!("rename {} to {}", before.name, after.name),
                    before,
                )),
                None => deltas.push(SemanticDelta::symbol(
                    DeltaType::SymbolRemoved,
                    if before.exported { Severity::High } else { Severity::Low },
                    format!("remove {}", before.name),
                    before,
                )),
            },
        }
    }

    for after in added.into_iter().filter(|s| !paired.contains(s.name.as_str())) {
        deltas.push(SemanticDelta::symbol(
            DeltaType::SymbolAdded,
            if after.exported { Severity::Medium } else { Severity::Low },
            format!("add {}", after.name),
            after,
        ));
    }

    deltas
}

/// Changes of one symbol present in both images.
fn diff_symbol(before: &Symbol, after: &Symbol) -> Vec<SemanticDelta> {
    let mut deltas = Vec::new();

    if before.exported && !after.exported {
        deltas.push(SemanticDelta::symbol(
            DeltaType::SignatureChanged,
            Severity::High,
            format!("stop exporting {}", before.name),
            before,
        ));
    } else if !before.same_signature(after) {
        deltas.push(SemanticDelta::symbol(
            DeltaType::SignatureChanged,
            if before.exported { Severity::High } else { Severity::Medium },
            format!("change signature of {}", before.name),
            before,
        ));
    }

    if !before.exported && after.exported {
        deltas.push(SemanticDelta::symbol(
            DeltaType::SymbolExported,
            Severity::Medium,
            format!("export {}", after.name),
            after,
        ));
    }

    if before.kind.is_container() && after.kind.is_container() {
        for member in before.members.iter().filter(|m| !after.members.contains(m)) {
            deltas.push(SemanticDelta::symbol(
                DeltaType::PropertyRemoved,
                if before.exported { Severity::High } else { Severity::Low },
                format!("remove {} from {}", member, before.name),
                before,
            ));
        }
        for member in after.members.iter().filter(|m| !before.members.contains(m)) {
            deltas.push(SemanticDelta::symbol(
                DeltaType::PropertyAdded,
                Severity::Low,
                format!("add {} to {}", member, after.name),
                after,
            ));
        }
    }

    deltas
}
