// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule-based classification.
//!
//! Rules are evaluated in declaration order and the first whose predicates
//! all hold assigns the commit type. Files on the non-versioning denylist
//! are always `chore` and never breaking.

mod builtin;
mod engine;
mod expr;
mod predicate;
mod ruleset;

pub use builtin::{builtin_rules, NON_VERSIONING_PATTERNS};
pub use engine::{ClassifiedChange, RulesEngine, NON_VERSIONING_RULE, UNCLASSIFIED};
pub use expr::Expr;
pub use predicate::{AstPattern, Glob, Predicate};
pub use ruleset::{load_rules_file, Heuristic, Rule, RuleSet};
