// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Validated, ordered rule sets.

use crate::config::{CommitType, RuleDefinition, RulesConfig};
use crate::error::{RuleConfigError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::builtin::{builtin_rules, NON_VERSIONING_PATTERNS};
use super::expr::Expr;
use super::predicate::{AstPattern, Glob, Predicate};

/// A type override evaluated after a rule matched.
#[derive(Debug, Clone)]
pub struct Heuristic {
    pub condition: Predicate,
    pub set: CommitType,
}

/// A validated classification rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    /// Predicates in evaluation order: `match`, `matchPath`, `matchAst`.
    pub predicates: Vec<Predicate>,
    pub commit_type: CommitType,
    pub reason: String,
    pub scope: Option<String>,
    pub heuristics: Vec<Heuristic>,
    pub builtin: bool,
}

impl Rule {
    /// Validate a definition. `index` is its position in the combined list.
    pub fn compile(definition: &RuleDefinition, index: usize, builtin: bool) -> Result<Self> {
        let id = match definition.id {
            Some(ref id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => return Err(RuleConfigError::MissingId { index }.into()),
        };

        let mut predicates = Vec::new();
        if let Some(ref pattern) = definition.glob {
            predicates.push(Predicate::Glob(compile_glob(&id, pattern)?));
        }
        if let Some(ref pattern) = definition.match_path {
            predicates.push(Predicate::PathGlob(compile_glob(&id, pattern)?));
        }
        if let Some(ref pattern) = definition.match_ast {
            let ast = AstPattern::parse(pattern).map_err(|message| RuleConfigError::InvalidAstPattern {
                id: id.clone(),
                pattern: pattern.clone(),
                message,
            })?;
            predicates.push(Predicate::Ast(ast));
        }
        if predicates.is_empty() {
            return Err(RuleConfigError::NoPredicate { id }.into());
        }

        let commit_type = parse_type(&id, definition.commit_type.as_deref())?;

        let heuristics = definition
            .heuristics
            .iter()
            .map(|h| -> Result<Heuristic> {
                let expr = Expr::parse(&h.condition).map_err(|message| RuleConfigError::InvalidHeuristic {
                    id: id.clone(),
                    expression: h.condition.clone(),
                    message,
                })?;
                Ok(Heuristic {
                    condition: Predicate::Expr(expr),
                    set: parse_type(&id, Some(&h.set))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            reason: definition.reason.clone().unwrap_or_else(|| id.clone()),
            scope: definition.scope.clone().filter(|s| !s.trim().is_empty()),
            id,
            predicates,
            commit_type,
            heuristics,
            builtin,
        })
    }

    /// `(kind, glob)` pairs of the path predicates.
    fn path_globs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.predicates.iter().filter_map(|p| match p {
            Predicate::Glob(glob) => Some(("match", glob.as_str())),
            Predicate::PathGlob(glob) => Some(("matchPath", glob.as_str())),
            _ => None,
        })
    }

    fn has_ast(&self) -> bool {
        self.predicates.iter().any(|p| matches!(p, Predicate::Ast(_)))
    }
}

fn compile_glob(id: &str, pattern: &str) -> Result<Glob> {
    Glob::new(pattern).map_err(|message| {
        RuleConfigError::InvalidGlob {
            id: id.to_string(),
            pattern: pattern.to_string(),
            message,
        }
        .into()
    })
}

fn parse_type(id: &str, value: Option<&str>) -> Result<CommitType> {
    let value = value.unwrap_or("");
    value.parse::<CommitType>().map_err(|_| {
        RuleConfigError::InvalidType {
            id: id.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

/// Rules in evaluation order plus the non-versioning denylist and breaking
/// patterns. Built once per run, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    non_versioning: Vec<Glob>,
    breaking_patterns: Vec<Regex>,
}

impl RuleSet {
    /// Build the effective rule set: inline custom rules, then the rules
    /// file, then the built-ins.
    pub fn from_config(config: &RulesConfig) -> Result<Self> {
        let mut definitions: Vec<(RuleDefinition, bool)> = config
            .custom_rules
            .iter()
            .cloned()
            .map(|d| (d, false))
            .collect();

        if let Some(ref path) = config.rules_file {
            definitions.extend(load_rules_file(path)?.into_iter().map(|d| (d, false)));
        }
        if config.use_builtin_rules {
            definitions.extend(builtin_rules().into_iter().map(|d| (d, true)));
        }

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(definitions.len());
        for (index, (definition, builtin)) in definitions.iter().enumerate() {
            let rule = Rule::compile(definition, index, *builtin)?;
            if !seen.insert(rule.id.clone()) {
                return Err(RuleConfigError::DuplicateId { id: rule.id }.into());
            }
            rules.push(rule);
        }

        let non_versioning = NON_VERSIONING_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(config.non_versioning_patterns.iter().cloned())
            .map(|pattern| -> Result<Glob> {
                Glob::new(&pattern).map_err(|message| {
                    RuleConfigError::InvalidPattern {
                        key: "rules.non_versioning_patterns".to_string(),
                        pattern: pattern.clone(),
                        message,
                    }
                    .into()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let breaking_patterns = config
            .breaking_change_patterns
            .iter()
            .map(|pattern| -> Result<Regex> {
                Regex::new(pattern).map_err(|e| {
                    RuleConfigError::InvalidPattern {
                        key: "rules.breaking_change_patterns".to_string(),
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    }
                    .into()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let set = Self {
            rules,
            non_versioning,
            breaking_patterns,
        };
        for (earlier, later) in set.ambiguous_pairs() {
            tracing::debug!("Rules '{}' and '{}' overlap; '{}' wins", earlier, later, earlier);
        }
        tracing::debug!("Loaded {} rules", set.len());
        Ok(set)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule pairs `(earlier, later)` that share a path glob but differ in
    /// whether they also inspect structure. Declaration order decides which
    /// one applies.
    pub fn ambiguous_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for (index, earlier) in self.rules.iter().enumerate() {
            for later in &self.rules[index + 1..] {
                let shared = earlier
                    .path_globs()
                    .any(|glob| later.path_globs().any(|other| other == glob));
                if shared && earlier.has_ast() != later.has_ast() {
                    pairs.push((earlier.id.as_str(), later.id.as_str()));
                }
            }
        }
        pairs
    }

    /// Whether the path is on the non-versioning denylist.
    pub fn is_non_versioning(&self, path: &str) -> bool {
        self.non_versioning.iter().any(|glob| glob.matches_path(path))
    }

    /// Whether a delta description matches a configured breaking pattern.
    pub fn is_breaking_description(&self, description: &str) -> bool {
        self.breaking_patterns.iter().any(|re| re.is_match(description))
    }
}

/// Read rule definitions from a YAML or JSON file (by extension; YAML otherwise).
pub fn load_rules_file(path: &Path) -> Result<Vec<RuleDefinition>> {
    let content = fs::read_to_string(path).map_err(|e| RuleConfigError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let definitions = if is_json {
        serde_json::from_str(&content).map_err(|e| RuleConfigError::ParseFailed {
            message: format!("{}: {}", path.display(), e),
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|e| RuleConfigError::ParseFailed {
            message: format!("{}: {}", path.display(), e),
        })?
    };

    tracing::debug!("Read rules from {}", path.display());
    Ok(definitions)
}
