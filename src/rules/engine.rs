// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule evaluation: assigns a commit type, reason and breaking flag.

use crate::config::CommitType;
use crate::pipeline::PipelineContext;
use crate::semantic::{SemanticChange, SemanticDelta, Severity};
use serde::Serialize;

use super::ruleset::RuleSet;

/// Rule id recorded for denylisted files.
pub const NON_VERSIONING_RULE: &str = "non-versioning";

/// Reason given when no rule applies.
pub const UNCLASSIFIED: &str = "unclassified";

/// A change with its classification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedChange {
    #[serde(flatten)]
    pub semantic: SemanticChange,
    pub commit_type: CommitType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_scope: Option<String>,
    pub breaking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaking_change_reason: Option<String>,
    pub reason: String,
    /// Matched rule id, then `<id>#<n>` for each heuristic that fired.
    pub applied_rules: Vec<String>,
    pub description: String,
    pub non_versioning: bool,
}

impl ClassifiedChange {
    pub fn path(&self) -> &str {
        self.semantic.path()
    }
}

/// Evaluates the rule set against each change.
#[derive(Debug, Default, Clone, Copy)]
pub struct RulesEngine;

impl RulesEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classify every change. Never fails.
    pub fn apply_rules(&self, changes: Vec<SemanticChange>, ctx: &PipelineContext) -> Vec<ClassifiedChange> {
        let records = ctx.map_files(changes, |_, change| self.classify(change, &ctx.rules));
        tracing::debug!("Classified {} files", records.len());
        records
    }

    /// Classify one change.
    pub fn classify(&self, change: SemanticChange, rules: &RuleSet) -> ClassifiedChange {
        let description = describe(&change);

        if rules.is_non_versioning(change.path()) {
            tracing::debug!("{}: non-versioning", change.path());
            return ClassifiedChange {
                semantic: change,
                commit_type: CommitType::Chore,
                commit_scope: None,
                breaking: false,
                breaking_change_reason: None,
                reason: "non-versioning file".to_string(),
                applied_rules: vec![NON_VERSIONING_RULE.to_string()],
                description,
                non_versioning: true,
            };
        }

        if change.is_degraded() {
            return unclassified(change, description);
        }

        let Some(rule) = rules
            .rules()
            .iter()
            .find(|rule| rule.predicates.iter().all(|p| p.matches(&change)))
        else {
            tracing::debug!("{}: no rule matched", change.path());
            return unclassified(change, description);
        };

        let mut commit_type = rule.commit_type;
        let mut applied_rules = vec![rule.id.clone()];
        for (index, heuristic) in rule.heuristics.iter().enumerate() {
            if heuristic.condition.matches(&change) {
                commit_type = heuristic.set;
                applied_rules.push(format!("{}#{}", rule.id, index));
            }
        }

        let breaking_change_reason = if commit_type.can_break() {
            breaking_trigger(&change.semantic_changes, rules).map(|d| d.description.clone())
        } else {
            None
        };

        tracing::debug!(
            "{}: {} by rule '{}'{}",
            change.path(),
            commit_type,
            rule.id,
            if breaking_change_reason.is_some() { " (breaking)" } else { "" }
        );

        ClassifiedChange {
            semantic: change,
            commit_type,
            commit_scope: rule.scope.clone(),
            breaking: breaking_change_reason.is_some(),
            breaking_change_reason,
            reason: rule.reason.clone(),
            applied_rules,
            description,
            non_versioning: false,
        }
    }
}

fn unclassified(change: SemanticChange, description: String) -> ClassifiedChange {
    ClassifiedChange {
        semantic: change,
        commit_type: CommitType::Chore,
        commit_scope: None,
        breaking: false,
        breaking_change_reason: None,
        reason: UNCLASSIFIED.to_string(),
        applied_rules: Vec::new(),
        description,
        non_versioning: false,
    }
}

/// The first high-severity delta, or the first whose description matches a
/// configured breaking pattern.
fn breaking_trigger<'a>(deltas: &'a [SemanticDelta], rules: &RuleSet) -> Option<&'a SemanticDelta> {
    deltas
        .iter()
        .find(|d| d.severity == Severity::High)
        .or_else(|| deltas.iter().find(|d| rules.is_breaking_description(&d.description)))
}

fn describe(change: &SemanticChange) -> String {
    match change.most_severe() {
        Some(delta) => delta.description.clone(),
        None => format!("update {}", change.context.change.file_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        AnalysisWarning, ChangeMetadata, ChangeStatus, ContentSnapshot, ContextualizedChange, FileChange,
        FileType, Stage, WarningKind,
    };
    use crate::config::{HeuristicDefinition, RuleDefinition, RulesConfig};
    use crate::semantic::{DeltaType, SymbolKind};
    use std::collections::BTreeSet;

    fn change(path: &str, status: ChangeStatus, deltas: Vec<SemanticDelta>) -> SemanticChange {
        SemanticChange {
            context: ContextualizedChange {
                change: FileChange::new(path, status),
                related_files: vec![],
                dependencies: vec![],
                metadata: ChangeMetadata {
                    lines_added: 3,
                    lines_removed: 1,
                    file_type: FileType::from_path(path),
                },
                warnings: vec![],
                content: ContentSnapshot::default(),
            },
            semantic_changes: deltas,
            affected_symbols: BTreeSet::new(),
            warnings: vec![],
        }
    }

    fn delta(delta_type: DeltaType, severity: Severity, exported: bool, description: &str) -> SemanticDelta {
        SemanticDelta {
            delta_type,
            description: description.to_string(),
            severity,
            affected_symbol: Some("fetchUser".to_string()),
            symbol_kind: Some(SymbolKind::Function),
            exported,
        }
    }

    fn builtin() -> RuleSet {
        RuleSet::from_config(&RulesConfig::default()).unwrap()
    }

    fn classify(change: SemanticChange, rules: &RuleSet) -> ClassifiedChange {
        RulesEngine::new().classify(change, rules)
    }

    #[test]
    fn test_exported_signature_change_is_breaking_fix() {
        let result = classify(
            change(
                "src/api.ts",
                ChangeStatus::Modified,
                vec![delta(
                    DeltaType::SignatureChanged,
                    Severity::High,
                    true,
                    "change signature of fetchUser",
                )],
            ),
            &builtin(),
        );
        assert_eq!(result.commit_type, CommitType::Fix);
        assert_eq!(result.applied_rules, vec!["public-api"]);
        assert!(result.breaking);
        assert_eq!(result.breaking_change_reason.as_deref(), Some("change signature of fetchUser"));
        assert_eq!(result.description, "change signature of fetchUser");
    }

    #[test]
    fn test_readme_is_docs() {
        let result = classify(
            change(
                "README.md",
                ChangeStatus::Modified,
                vec![SemanticDelta::non_code("README.md")],
            ),
            &builtin(),
        );
        assert_eq!(result.commit_type, CommitType::Docs);
        assert!(!result.breaking);
        assert_eq!(result.description, "update README.md");
    }

    #[test]
    fn test_non_versioning_overrides_everything() {
        let high = delta(DeltaType::SymbolRemoved, Severity::High, true, "remove fetchUser");
        let result = classify(
            change("package-lock.json", ChangeStatus::Modified, vec![high]),
            &builtin(),
        );
        assert_eq!(result.commit_type, CommitType::Chore);
        assert!(result.non_versioning);
        assert!(!result.breaking);
        assert_eq!(result.applied_rules, vec![NON_VERSIONING_RULE]);
        assert_eq!(result.reason, "non-versioning file");
    }

    #[test]
    fn test_removed_symbol_classified_fix_is_breaking() {
        let config = RulesConfig {
            use_builtin_rules: false,
            custom_rules: vec![RuleDefinition {
                id: Some("everything".to_string()),
                glob: Some("**".to_string()),
                commit_type: Some("fix".to_string()),
                reason: Some("any".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let rules = RuleSet::from_config(&config).unwrap();
        let removed = delta(DeltaType::SymbolRemoved, Severity::High, true, "remove fetchUser");

        let code = classify(change("src/a.ts", ChangeStatus::Modified, vec![removed.clone()]), &rules);
        assert_eq!(code.commit_type, CommitType::Fix);
        assert!(code.breaking);

        let lockfile = classify(change("yarn.lock", ChangeStatus::Modified, vec![removed]), &rules);
        assert!(!lockfile.breaking);
    }

    #[test]
    fn test_breaking_needs_breakable_type() {
        let high = delta(DeltaType::SignatureChanged, Severity::High, true, "change signature of fetchUser");
        let result = classify(change("src/api.test.ts", ChangeStatus::Modified, vec![high]), &builtin());
        assert_eq!(result.commit_type, CommitType::Test);
        assert!(!result.breaking);
    }

    #[test]
    fn test_degraded_file_is_unclassified() {
        let mut degraded = change(
            "src/a.ts",
            ChangeStatus::Modified,
            vec![SemanticDelta::non_code("a.ts")],
        );
        degraded.warnings.push(AnalysisWarning::new(
            "src/a.ts",
            Stage::Analyze,
            WarningKind::Parse,
            "unclosed '{'",
        ));
        let result = classify(degraded, &builtin());
        assert_eq!(result.commit_type, CommitType::Chore);
        assert_eq!(result.reason, UNCLASSIFIED);
        assert!(result.applied_rules.is_empty());
    }

    #[test]
    fn test_no_match_is_unclassified() {
        let result = classify(
            change("assets/logo.png", ChangeStatus::Added, vec![]),
            &builtin(),
        );
        assert_eq!(result.commit_type, CommitType::Chore);
        assert_eq!(result.reason, UNCLASSIFIED);
        assert_eq!(result.description, "update logo.png");
    }

    #[test]
    fn test_first_match_wins_and_predicates_are_anded() {
        let config = RulesConfig {
            use_builtin_rules: false,
            custom_rules: vec![
                RuleDefinition {
                    id: Some("api-break".to_string()),
                    match_path: Some("src/api".to_string()),
                    match_ast: Some("* severity>=high".to_string()),
                    commit_type: Some("feat".to_string()),
                    scope: Some("api".to_string()),
                    ..Default::default()
                },
                RuleDefinition {
                    id: Some("api".to_string()),
                    match_path: Some("src/api".to_string()),
                    commit_type: Some("refactor".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let rules = RuleSet::from_config(&config).unwrap();

        let low = delta(DeltaType::SymbolAdded, Severity::Low, false, "add helper");
        let result = classify(change("src/api/users.ts", ChangeStatus::Modified, vec![low]), &rules);
        assert_eq!(result.applied_rules, vec!["api"]);
        assert_eq!(result.commit_scope, None);

        let high = delta(DeltaType::SymbolRemoved, Severity::High, true, "remove fetchUser");
        let result = classify(change("src/api/users.ts", ChangeStatus::Modified, vec![high]), &rules);
        assert_eq!(result.applied_rules, vec!["api-break"]);
        assert_eq!(result.commit_scope.as_deref(), Some("api"));
        assert_eq!(result.reason, "api-break");
    }

    #[test]
    fn test_later_heuristics_override_earlier() {
        let config = RulesConfig {
            use_builtin_rules: false,
            custom_rules: vec![RuleDefinition {
                id: Some("code".to_string()),
                glob: Some("*.ts".to_string()),
                commit_type: Some("fix".to_string()),
                reason: Some("code".to_string()),
                heuristics: vec![
                    HeuristicDefinition {
                        condition: "is_new_file".to_string(),
                        set: "feat".to_string(),
                    },
                    HeuristicDefinition {
                        condition: "lines_added > 2".to_string(),
                        set: "refactor".to_string(),
                    },
                    HeuristicDefinition {
                        condition: "is_deleted_file".to_string(),
                        set: "chore".to_string(),
                    },
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let rules = RuleSet::from_config(&config).unwrap();
        let result = classify(change("src/a.ts", ChangeStatus::Added, vec![]), &rules);
        assert_eq!(result.commit_type, CommitType::Refactor);
        assert_eq!(result.applied_rules, vec!["code", "code#0", "code#1"]);
        assert_eq!(result.reason, "code");
    }

    #[test]
    fn test_breaking_pattern_on_description() {
        let config = RulesConfig {
            breaking_change_patterns: vec!["^remove ".to_string()],
            ..Default::default()
        };
        let rules = RuleSet::from_config(&config).unwrap();
        let removed = delta(DeltaType::SymbolRemoved, Severity::Low, false, "remove helper");
        let result = classify(change("src/util.ts", ChangeStatus::Modified, vec![removed]), &rules);
        assert_eq!(result.commit_type, CommitType::Fix);
        assert!(result.breaking);
        assert_eq!(result.breaking_change_reason.as_deref(), Some("remove helper"));
    }

    #[test]
    fn test_every_change_gets_exactly_one_type() {
        let rules = builtin();
        for path in ["src/a.rs", "docs/guide.txt", "Cargo.toml", "x.bin", "tests/cli.rs", ".github/ci.yml"] {
            let result = classify(change(path, ChangeStatus::Modified, vec![]), &rules);
            assert!(CommitType::all().contains(&result.commit_type));
        }
    }
}
