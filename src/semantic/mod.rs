// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Structural analysis of changed source files.
//!
//! Each image of a change is parsed with tree-sitter and reduced to its
//! top-level symbols (name, kind, visibility, parameters, members), and the
//! two symbol tables are diffed into [`SemanticDelta`]s. TypeScript,
//! JavaScript, Rust, Python and Go are understood; everything else is a
//! non-code change.

mod analyzer;
mod delta;
mod extract;
mod source;
mod symbols;

pub use analyzer::{diff_symbols, SemanticAnalyzer};
pub use delta::{DeltaType, SemanticChange, SemanticDelta, Severity};
pub use source::Deadline;
pub use symbols::{extract_symbols, Param, Symbol, SymbolKind};
