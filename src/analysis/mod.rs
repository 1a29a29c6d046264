// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Change detection and context correlation.
//!
//! The first two pipeline stages: [`ChangeDetector`] lists the files that
//! differ between two revisions and [`ContextCorrelator`] attaches line
//! counts, file types and import context to each of them.

mod change;
mod context;
mod detector;
mod imports;
mod language;
mod warnings;

pub use change::{ChangeMetadata, ChangeStatus, ContentSnapshot, ContextualizedChange, FileChange};
pub use context::{count_lines, ContextCorrelator};
pub use detector::{parse_name_status, ChangeDetector};
pub use language::FileType;
pub use warnings::{AnalysisWarning, Stage, WarningKind, WarningLevel};
