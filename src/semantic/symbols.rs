// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Top-level symbols and the helpers the language front ends share.

use crate::analysis::FileType;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tree_sitter::Node;

use super::extract;
use super::source::{parse_tree, Deadline};

/// Kind of a declared symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Interface,
    Struct,
    Trait,
    Enum,
    Type,
    Constant,
    Variable,
    Module,
}

impl SymbolKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Struct => "struct",
            SymbolKind::Trait => "trait",
            SymbolKind::Enum => "enum",
            SymbolKind::Type => "type",
            SymbolKind::Constant => "constant",
            SymbolKind::Variable => "variable",
            SymbolKind::Module => "module",
        }
    }

    /// Whether symbols of this kind carry members.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Interface
                | SymbolKind::Struct
                | SymbolKind::Trait
                | SymbolKind::Enum
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SymbolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "function" | "fn" => Ok(SymbolKind::Function),
            "method" => Ok(SymbolKind::Method),
            "class" => Ok(SymbolKind::Class),
            "interface" => Ok(SymbolKind::Interface),
            "struct" => Ok(SymbolKind::Struct),
            "trait" => Ok(SymbolKind::Trait),
            "enum" => Ok(SymbolKind::Enum),
            "type" => Ok(SymbolKind::Type),
            "constant" | "const" => Ok(SymbolKind::Constant),
            "variable" | "var" => Ok(SymbolKind::Variable),
            "module" | "mod" => Ok(SymbolKind::Module),
            _ => Err(format!("unknown symbol kind '{}'", s)),
        }
    }
}

/// One parameter of a callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: Option<String>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub exported: bool,
    /// `None` for non-callables.
    pub params: Option<Vec<Param>>,
    /// Member names, for containers.
    pub members: Vec<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, exported: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            exported,
            params: None,
            members: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }

    /// Parameter count and types match. Parameter names are ignored.
    pub fn same_signature(&self, other: &Symbol) -> bool {
        match (&self.params, &other.params) {
            (Some(a), Some(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.ty == y.ty)
            }
            (None, None) => true,
            _ => false,
        }
    }

    /// Rendered parameter list, e.g. `(id: string, opts)`.
    pub fn signature(&self) -> String {
        match self.params {
            Some(ref params) => {
                let rendered: Vec<String> = params
                    .iter()
                    .map(|p| match p.ty {
                        Some(ref ty) => format!("{}: {}", p.name, ty),
                        None => p.name.clone(),
                    })
                    .collect();
                format!("({})", rendered.join(", "))
            }
            None => String::new(),
        }
    }
}

/// Extract top-level symbols. Names are unique; the first declaration wins.
pub fn extract_symbols(
    path: &str,
    file_type: FileType,
    content: &str,
    deadline: &Deadline,
) -> Result<Vec<Symbol>, AnalysisError> {
    let Some(tree) = parse_tree(path, file_type, content, deadline)? else {
        return Ok(Vec::new());
    };
    let root = tree.root_node();
    let source = SourceFile {
        path,
        bytes: content.as_bytes(),
        deadline,
    };

    let symbols = match file_type {
        FileType::TypeScript | FileType::JavaScript => extract::javascript(root, &source)?,
        FileType::Rust => extract::rust(root, &source)?,
        FileType::Python => extract::python(root, &source)?,
        FileType::Go => extract::go(root, &source)?,
        _ => Vec::new(),
    };

    let mut seen = HashSet::new();
    Ok(symbols
        .into_iter()
        .filter(|s| seen.insert(s.name.clone()))
        .collect())
}

/// Source text of a parsed file, shared by the language walkers.
pub(super) struct SourceFile<'a> {
    pub path: &'a str,
    pub bytes: &'a [u8],
    pub deadline: &'a Deadline,
}

impl<'a> SourceFile<'a> {
    pub fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.bytes).unwrap_or("")
    }

    /// Text of a named field, if present.
    pub fn field(&self, node: Node, field: &str) -> Option<&'a str> {
        node.child_by_field_name(field).map(|child| self.text(child))
    }

    /// Fail once the file's deadline has passed.
    pub fn check_deadline(&self) -> Result<(), AnalysisError> {
        self.deadline.check(self.path)
    }
}

/// Collapse runs of whitespace into single spaces.
pub(super) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A type annotation without its leading `:`, whitespace collapsed.
pub(super) fn annotation(text: &str) -> Option<String> {
    Some(collapse_whitespace(text.trim_start_matches(':'))).filter(|t| !t.is_empty())
}
