// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Importance scoring of classified changes.
//!
//! A score is the clamped weighted sum of four factors. Recorded weights are
//! the effective ones, so the factors of a [`ScoredChange`] always reproduce
//! its score.

use crate::config::ScoringConfig;
use crate::pipeline::PipelineContext;
use crate::rules::ClassifiedChange;
use crate::semantic::Severity;
use serde::Serialize;

/// Upper bound of a score.
pub const MAX_SCORE: f64 = 10.0;

/// One weighted contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreFactor {
    pub name: &'static str,
    pub value: f64,
    pub weight: f64,
}

impl ScoreFactor {
    pub fn contribution(&self) -> f64 {
        self.value * self.weight
    }
}

/// A change with its importance score in `[0, 10]`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredChange {
    #[serde(flatten)]
    pub classified: ClassifiedChange,
    pub score: f64,
    pub score_factors: Vec<ScoreFactor>,
}

impl ScoredChange {
    pub fn path(&self) -> &str {
        self.classified.path()
    }
}

/// Computes importance scores.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoringSystem;

impl ScoringSystem {
    pub fn new() -> Self {
        Self
    }

    /// Score every change. Never fails.
    pub fn score(&self, changes: Vec<ClassifiedChange>, ctx: &PipelineContext) -> Vec<ScoredChange> {
        changes
            .into_iter()
            .map(|change| self.score_one(change, &ctx.config.scoring))
            .collect()
    }

    pub fn score_one(&self, change: ClassifiedChange, config: &ScoringConfig) -> ScoredChange {
        let score_factors = factors(&change, config);
        let score = total(&score_factors);
        tracing::debug!("{}: score {:.2}", change.path(), score);

        ScoredChange {
            classified: change,
            score,
            score_factors,
        }
    }
}

fn factors(change: &ClassifiedChange, config: &ScoringConfig) -> Vec<ScoreFactor> {
    let metadata = &change.semantic.context.metadata;
    let lines = (metadata.lines_added + metadata.lines_removed) as f64;
    let high = change
        .semantic
        .semantic_changes
        .iter()
        .filter(|d| d.severity == Severity::High)
        .count() as f64;
    let fanout = change.semantic.context.dependencies.len() as f64;

    let scale = if change.non_versioning {
        config.non_versioning_weight_factor
    } else {
        1.0
    };

    vec![
        ScoreFactor {
            name: "linesOfCode",
            value: (1.0 + lines).log2(),
            weight: config.lines_of_code * scale,
        },
        ScoreFactor {
            name: "semanticImportance",
            value: high,
            weight: config.semantic_importance * scale,
        },
        ScoreFactor {
            name: "breakingPenaltyBonus",
            value: if change.breaking { config.breaking_bonus } else { 0.0 },
            weight: config.breaking_penalty_bonus * scale,
        },
        ScoreFactor {
            name: "dependencyFanout",
            value: fanout,
            weight: config.dependency_fanout * scale,
        },
    ]
}

/// Clamped sum of the factor contributions.
pub fn total(factors: &[ScoreFactor]) -> f64 {
    let sum: f64 = factors.iter().map(ScoreFactor::contribution).sum();
    sum.clamp(0.0, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ChangeMetadata, ChangeStatus, ContentSnapshot, ContextualizedChange, FileChange, FileType};
    use crate::config::CommitType;
    use crate::semantic::{DeltaType, SemanticChange, SemanticDelta};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn classified(lines: usize, high: usize, breaking: bool, dependencies: usize, non_versioning: bool) -> ClassifiedChange {
        let deltas = (0..high)
            .map(|i| SemanticDelta::file(DeltaType::SymbolRemoved, Severity::High, format!("remove f{}", i)))
            .collect();
        ClassifiedChange {
            semantic: SemanticChange {
                context: ContextualizedChange {
                    change: FileChange::new("src/a.rs", ChangeStatus::Modified),
                    related_files: vec![],
                    dependencies: (0..dependencies).map(|i| format!("src/dep{}.rs", i)).collect(),
                    metadata: ChangeMetadata {
                        lines_added: lines,
                        lines_removed: 0,
                        file_type: FileType::Rust,
                    },
                    warnings: vec![],
                    content: ContentSnapshot::default(),
                },
                semantic_changes: deltas,
                affected_symbols: BTreeSet::new(),
                warnings: vec![],
            },
            commit_type: CommitType::Fix,
            commit_scope: None,
            breaking,
            breaking_change_reason: None,
            reason: "test".to_string(),
            applied_rules: vec![],
            description: "update a.rs".to_string(),
            non_versioning,
        }
    }

    fn score(change: ClassifiedChange) -> ScoredChange {
        ScoringSystem::new().score_one(change, &ScoringConfig::default())
    }

    #[test]
    fn test_default_weights() {
        // 7 lines: log2(8) = 3 -> 1.5; one high delta -> 0.8; breaking -> 3.0; two deps -> 0.6
        let scored = score(classified(7, 1, true, 2, false));
        assert!((scored.score - 5.9).abs() < 1e-9);
        let names: Vec<&str> = scored.score_factors.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["linesOfCode", "semanticImportance", "breakingPenaltyBonus", "dependencyFanout"]
        );
    }

    #[test]
    fn test_empty_change_scores_zero() {
        assert_eq!(score(classified(0, 0, false, 0, false)).score, 0.0);
    }

    #[test]
    fn test_clamped_to_ten() {
        let scored = score(classified(100_000, 20, true, 50, false));
        assert_eq!(scored.score, MAX_SCORE);
    }

    #[test]
    fn test_non_versioning_scaled() {
        let scored = score(classified(7, 0, false, 0, true));
        assert!((scored.score - 0.15).abs() < 1e-9);
        assert!((scored.score_factors[0].weight - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_serialized_factor_shape() {
        let json = serde_json::to_value(score(classified(1, 0, false, 0, false))).unwrap();
        assert_eq!(json["scoreFactors"][0]["name"], "linesOfCode");
        assert_eq!(json["scoreFactors"][0]["weight"], 0.5);
        assert_eq!(json["path"], "src/a.rs");
    }

    proptest! {
        #[test]
        fn score_within_bounds(
            lines in 0usize..1_000_000,
            high in 0usize..30,
            breaking in any::<bool>(),
            deps in 0usize..40,
            non_versioning in any::<bool>(),
        ) {
            let scored = score(classified(lines, high, breaking, deps, non_versioning));
            prop_assert!(scored.score >= 0.0 && scored.score <= MAX_SCORE);
        }

        #[test]
        fn factors_reproduce_score(
            lines in 0usize..100_000,
            high in 0usize..10,
            breaking in any::<bool>(),
            deps in 0usize..10,
            non_versioning in any::<bool>(),
        ) {
            let scored = score(classified(lines, high, breaking, deps, non_versioning));
            prop_assert_eq!(total(&scored.score_factors), scored.score);
        }

        #[test]
        fn score_monotonic_in_lines(
            lines in 0usize..100_000,
            extra in 0usize..100_000,
            high in 0usize..5,
            breaking in any::<bool>(),
        ) {
            let smaller = score(classified(lines, high, breaking, 0, false));
            let larger = score(classified(lines + extra, high, breaking, 0, false));
            prop_assert!(larger.score >= smaller.score);
        }
    }
}
