// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Built-in classification rules.

use crate::config::{HeuristicDefinition, RuleDefinition};

/// Paths whose changes never carry version semantics.
pub const NON_VERSIONING_PATTERNS: &[&str] = &[
    // Lockfiles
    "{Cargo.lock,package-lock.json,npm-shrinkwrap.json,yarn.lock,pnpm-lock.yaml,bun.lockb}",
    "{poetry.lock,Pipfile.lock,uv.lock,composer.lock,Gemfile.lock,go.sum,*.lock}",
    // Repository metadata
    "{.gitignore,.gitattributes,.gitmodules,.mailmap}",
    // Generated artifacts
    "{**/dist/**,**/node_modules/**}",
    "{*.min.js,*.min.css,*.map}",
];

fn rule(id: &str, commit_type: &str, reason: &str) -> RuleDefinition {
    RuleDefinition {
        id: Some(id.to_string()),
        commit_type: Some(commit_type.to_string()),
        reason: Some(reason.to_string()),
        ..Default::default()
    }
}

fn heuristic(condition: &str, set: &str) -> HeuristicDefinition {
    HeuristicDefinition {
        condition: condition.to_string(),
        set: set.to_string(),
    }
}

/// Built-in rules in evaluation order.
pub fn builtin_rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition {
            glob: Some("{*.test.*,*.spec.*,*_test.go,*_test.py,test_*.py}".to_string()),
            ..rule("test-files", "test", "test file")
        },
        RuleDefinition {
            match_path: Some("{**/tests,**/test,**/__tests__,**/testdata}".to_string()),
            ..rule("test-dirs", "test", "file in a test directory")
        },
        RuleDefinition {
            glob: Some("{*.md,*.mdx,*.rst,*.adoc,LICENSE*,CHANGELOG*,AUTHORS*}".to_string()),
            ..rule("docs", "docs", "documentation")
        },
        RuleDefinition {
            match_path: Some("{**/docs,**/doc}".to_string()),
            ..rule("docs-dir", "docs", "file in a documentation directory")
        },
        RuleDefinition {
            match_path: Some("{.github,.gitlab,.circleci}".to_string()),
            ..rule("ci", "chore", "CI configuration")
        },
        RuleDefinition {
            glob: Some(
                "{Cargo.toml,package.json,go.mod,pyproject.toml,setup.py,setup.cfg,Makefile,Dockerfile,tsconfig*.json}"
                    .to_string(),
            ),
            ..rule("build", "chore", "build configuration")
        },
        RuleDefinition {
            match_ast: Some("signature_changed exported".to_string()),
            ..rule("public-api", "fix", "exported signature changed")
        },
        RuleDefinition {
            match_ast: Some("symbol_removed exported".to_string()),
            ..rule("removed-api", "refactor", "exported symbol removed")
        },
        RuleDefinition {
            match_ast: Some("symbol_added exported".to_string()),
            ..rule("new-api", "feat", "new exported symbol")
        },
        RuleDefinition {
            match_ast: Some("symbol_exported".to_string()),
            ..rule("exposed-api", "feat", "symbol newly exported")
        },
        RuleDefinition {
            match_ast: Some("file_added severity>=medium".to_string()),
            ..rule("new-module", "feat", "new module with exported symbols")
        },
        RuleDefinition {
            glob: Some(
                "{*.ts,*.tsx,*.js,*.jsx,*.mjs,*.cjs,*.rs,*.py,*.go,*.java,*.c,*.h,*.cpp,*.hpp,*.cs,*.rb,*.sh}"
                    .to_string(),
            ),
            heuristics: vec![
                heuristic("is_new_file", "feat"),
                heuristic("is_deleted_file || is_renamed_file", "refactor"),
                heuristic("has_signature_change && !has_high_severity", "refactor"),
                heuristic("only_deletions", "refactor"),
            ],
            ..rule("source", "fix", "source change")
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_unique() {
        let rules = builtin_rules();
        let ids: HashSet<_> = rules.iter().filter_map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_builtins_have_a_predicate() {
        for rule in builtin_rules() {
            assert!(
                rule.glob.is_some() || rule.match_path.is_some() || rule.match_ast.is_some(),
                "{:?} has no predicate",
                rule.id
            );
        }
    }
}
