// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Structural deltas and the semantic stage record.

use crate::analysis::{AnalysisWarning, ContextualizedChange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::symbols::{Symbol, SymbolKind};

/// Kind of structural difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaType {
    SymbolAdded,
    SymbolRemoved,
    SymbolRenamed,
    SymbolExported,
    SignatureChanged,
    PropertyAdded,
    PropertyRemoved,
    FileAdded,
    FileDeleted,
    FileRenamed,
    NonCodeChange,
}

impl DeltaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaType::SymbolAdded => "symbol_added",
            DeltaType::SymbolRemoved => "symbol_removed",
            DeltaType::SymbolRenamed => "symbol_renamed",
            DeltaType::SymbolExported => "symbol_exported",
            DeltaType::SignatureChanged => "signature_changed",
            DeltaType::PropertyAdded => "property_added",
            DeltaType::PropertyRemoved => "property_removed",
            DeltaType::FileAdded => "file_added",
            DeltaType::FileDeleted => "file_deleted",
            DeltaType::FileRenamed => "file_renamed",
            DeltaType::NonCodeChange => "non_code_change",
        }
    }

    pub fn all() -> &'static [DeltaType] {
        &[
            DeltaType::SymbolAdded,
            DeltaType::SymbolRemoved,
            DeltaType::SymbolRenamed,
            DeltaType::SymbolExported,
            DeltaType::SignatureChanged,
            DeltaType::PropertyAdded,
            DeltaType::PropertyRemoved,
            DeltaType::FileAdded,
            DeltaType::FileDeleted,
            DeltaType::FileRenamed,
            DeltaType::NonCodeChange,
        ]
    }
}

impl fmt::Display for DeltaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeltaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeltaType::all()
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown delta type: {}", s))
    }
}

/// How much a delta matters, ordered `minor < low < medium < high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minor" => Ok(Severity::Minor),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// One detected difference between two versions of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticDelta {
    #[serde(rename = "type")]
    pub delta_type: DeltaType,
    /// Imperative summary, e.g. `change signature of fetchUser`.
    pub description: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_kind: Option<SymbolKind>,
    /// Whether the affected symbol is visible outside its file.
    pub exported: bool,
}

impl SemanticDelta {
    /// A file-level delta with no symbol.
    pub fn file(delta_type: DeltaType, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            delta_type,
            description: description.into(),
            severity,
            affected_symbol: None,
            symbol_kind: None,
            exported: false,
        }
    }

    /// A delta about `symbol`.
    pub fn symbol(
        delta_type: DeltaType,
        severity: Severity,
        description: impl Into<String>,
        symbol: &Symbol,
    ) -> Self {
        Self {
            delta_type,
            description: description.into(),
            severity,
            affected_symbol: Some(symbol.name.clone()),
            symbol_kind: Some(symbol.kind),
            exported: symbol.exported,
        }
    }

    /// The single delta of a file that is not structurally analyzed.
    pub fn non_code(file_name: &str) -> Self {
        Self::file(
            DeltaType::NonCodeChange,
            Severity::Minor,
            format!("update {}", file_name),
        )
    }
}

/// A change with its structural deltas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticChange {
    #[serde(flatten)]
    pub context: ContextualizedChange,
    pub semantic_changes: Vec<SemanticDelta>,
    pub affected_symbols: BTreeSet<String>,
    #[serde(rename = "semanticWarnings", skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalysisWarning>,
}

impl SemanticChange {
    pub fn path(&self) -> &str {
        self.context.path()
    }

    /// Warnings of this and every earlier stage, oldest first.
    pub fn all_warnings(&self) -> impl Iterator<Item = &AnalysisWarning> {
        self.context.warnings.iter().chain(self.warnings.iter())
    }

    /// Whether some warning prevents a trustworthy classification.
    pub fn is_degraded(&self) -> bool {
        self.all_warnings().any(|w| w.kind.is_degrading())
    }

    /// The first delta of the highest severity.
    pub fn most_severe(&self) -> Option<&SemanticDelta> {
        self.semantic_changes
            .iter()
            .fold(None, |best: Option<&SemanticDelta>, delta| match best {
                Some(b) if b.severity >= delta.severity => Some(b),
                _ => Some(delta),
            })
    }
}
