// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines all configuration structures that can be loaded from
//! commitlens.toml. Keys are snake_case; camelCase aliases are accepted so
//! settings written for other tooling keep working.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The main configuration structure for commitlens.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LensConfig {
    /// Analysis limits.
    pub analysis: AnalysisConfig,

    /// Rule configuration.
    pub rules: RulesConfig,

    /// Scoring weights.
    pub scoring: ScoringConfig,

    /// Parallelism and caching.
    pub advanced: AdvancedConfig,

    /// Report output settings.
    pub output: OutputConfig,
}

impl LensConfig {
    /// Load configuration from the default locations.
    pub fn load() -> crate::error::Result<Self> {
        super::loader::load_config()
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }
}

/// Analysis limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Files beyond this count (in diff order) skip structural parsing.
    #[serde(alias = "maxFilesToAnalyze")]
    pub max_files_to_analyze: usize,

    /// Per-file structural parse budget in milliseconds.
    #[serde(alias = "fileAnalysisTimeout")]
    pub file_analysis_timeout: u64,

    /// How many import hops the correlator follows.
    #[serde(alias = "contextDepth")]
    pub context_depth: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_files_to_analyze: 500,
            file_analysis_timeout: 5000,
            context_depth: 2,
        }
    }
}

/// Rule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Whether the built-in rules are appended after custom rules.
    #[serde(alias = "useBuiltinRules")]
    pub use_builtin_rules: bool,

    /// Inline rule definitions, evaluated before the built-in rules.
    #[serde(alias = "customRules")]
    pub custom_rules: Vec<RuleDefinition>,

    /// YAML or JSON file with more rule definitions.
    #[serde(alias = "rulesFile")]
    pub rules_file: Option<PathBuf>,

    /// Regexes over delta descriptions that count as breaking triggers.
    #[serde(alias = "breakingChangePatterns")]
    pub breaking_change_patterns: Vec<String>,

    /// Extra globs for files that never carry version semantics.
    #[serde(alias = "nonVersioningPatterns")]
    pub non_versioning_patterns: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            use_builtin_rules: true,
            custom_rules: Vec::new(),
            rules_file: None,
            breaking_change_patterns: Vec::new(),
            non_versioning_patterns: Vec::new(),
        }
    }
}

/// A rule as written in configuration, before validation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleDefinition {
    /// Unique rule id.
    pub id: Option<String>,

    /// Glob over the full path.
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,

    /// Glob over leading directory prefixes.
    #[serde(alias = "match_path", skip_serializing_if = "Option::is_none")]
    pub match_path: Option<String>,

    /// Structural pattern over semantic deltas.
    #[serde(alias = "match_ast", skip_serializing_if = "Option::is_none")]
    pub match_ast: Option<String>,

    /// Commit type assigned on match.
    #[serde(rename = "type")]
    pub commit_type: Option<String>,

    /// Human-readable reason.
    pub reason: Option<String>,

    /// Optional commit scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Type overrides evaluated after the base match.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub heuristics: Vec<HeuristicDefinition>,
}

/// A heuristic override as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeuristicDefinition {
    /// Predicate expression.
    #[serde(rename = "if")]
    pub condition: String,

    /// Commit type set when the expression holds.
    pub set: String,
}

/// Scoring weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of log-scaled lines changed.
    #[serde(alias = "linesOfCode")]
    pub lines_of_code: f64,

    /// Weight of the high-severity delta count.
    #[serde(alias = "semanticImportance")]
    pub semantic_importance: f64,

    /// Weight of the breaking bonus.
    #[serde(alias = "breakingPenaltyBonus")]
    pub breaking_penalty_bonus: f64,

    /// Weight of the dependency count.
    #[serde(alias = "dependencyFanout")]
    pub dependency_fanout: f64,

    /// Factor value contributed by a breaking change.
    #[serde(alias = "breakingBonus")]
    pub breaking_bonus: f64,

    /// Multiplier applied to every weight for non-versioning files.
    #[serde(alias = "nonVersioningWeightFactor")]
    pub non_versioning_weight_factor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lines_of_code: 0.5,
            semantic_importance: 0.8,
            breaking_penalty_bonus: 1.0,
            dependency_fanout: 0.3,
            breaking_bonus: 3.0,
            non_versioning_weight_factor: 0.1,
        }
    }
}

/// Parallelism and caching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    /// Run per-file work on a thread pool.
    #[serde(alias = "parallelAnalysis")]
    pub parallel_analysis: bool,

    /// Thread pool size.
    #[serde(alias = "maxParallelProcesses")]
    pub max_parallel_processes: usize,

    /// Persist semantic results per revision pair.
    #[serde(alias = "cacheResults")]
    pub cache_results: bool,

    /// Cache directory (defaults to the user cache dir).
    #[serde(alias = "cacheDir")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            parallel_analysis: true,
            max_parallel_processes: 4,
            cache_results: false,
            cache_dir: None,
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format for the CLI.
    pub format: OutputFormat,

    /// Maximum bullet points in the suggested commit body.
    #[serde(alias = "maxBodyItems")]
    pub max_body_items: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            max_body_items: 5,
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Console text
    Text,
    /// Full report as JSON
    Json,
    /// Changelog-style Markdown
    Markdown,
}

/// Commit type.
///
/// Variants are declared in report priority order, so the derived `Ord`
/// ranks `feat` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Refactor,
    Docs,
    Test,
    Chore,
}

impl CommitType {
    /// Get the string representation of the commit type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Refactor => "refactor",
            CommitType::Docs => "docs",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }

    /// Get a description of the commit type.
    pub fn description(&self) -> &'static str {
        match self {
            CommitType::Feat => "A new feature",
            CommitType::Fix => "A bug fix",
            CommitType::Refactor => "Code refactoring (no feature/fix)",
            CommitType::Docs => "Documentation only changes",
            CommitType::Test => "Adding or updating tests",
            CommitType::Chore => "Maintenance and auxiliary changes",
        }
    }

    /// Get all commit types, in priority order.
    pub fn all() -> &'static [CommitType] {
        &[
            CommitType::Feat,
            CommitType::Fix,
            CommitType::Refactor,
            CommitType::Docs,
            CommitType::Test,
            CommitType::Chore,
        ]
    }

    /// Whether a change of this type can carry a breaking flag.
    pub fn can_break(&self) -> bool {
        matches!(self, CommitType::Feat | CommitType::Fix | CommitType::Refactor)
    }
}

impl std::str::FromStr for CommitType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feat" | "feature" => Ok(CommitType::Feat),
            "fix" | "bugfix" => Ok(CommitType::Fix),
            "refactor" => Ok(CommitType::Refactor),
            "docs" | "doc" => Ok(CommitType::Docs),
            "test" | "tests" => Ok(CommitType::Test),
            "chore" => Ok(CommitType::Chore),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
