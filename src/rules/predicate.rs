// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule predicates: path globs, structural patterns and heuristic expressions.

use crate::semantic::{DeltaType, SemanticChange, SemanticDelta, Severity, SymbolKind};
use glob::{MatchOptions, Pattern};
use std::fmt;

use super::expr::Expr;

/// `*` never crosses `/`; `**` does when it is a whole component.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A glob with `{a,b}` alternatives.
#[derive(Debug, Clone)]
pub struct Glob {
    source: String,
    patterns: Vec<Pattern>,
}

impl Glob {
    /// Compile a glob, expanding brace alternatives.
    pub fn new(pattern: &str) -> Result<Self, String> {
        let patterns = expand_braces(pattern)?
            .iter()
            .map(|p| Pattern::new(p).map_err(|e| e.msg.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: pattern.to_string(),
            patterns,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match the full path. Alternatives without `/` match the file name.
    pub fn matches_path(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        self.patterns.iter().any(|p| {
            let target = if p.as_str().contains('/') { path } else { file_name };
            p.matches_with(target, MATCH_OPTIONS)
        })
    }

    /// Match any leading directory prefix of the path.
    pub fn matches_dir_prefix(&self, path: &str) -> bool {
        path.match_indices('/').any(|(end, _)| {
            let prefix = &path[..end];
            self.patterns.iter().any(|p| p.matches_with(prefix, MATCH_OPTIONS))
        })
    }
}

/// Expand `{a,b}` groups into every alternative, left to right.
fn expand_braces(pattern: &str) -> Result<Vec<String>, String> {
    let Some(open) = pattern.find('{') else {
        if pattern.contains('}') {
            return Err("unbalanced '}'".to_string());
        }
        return Ok(vec![pattern.to_string()]);
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(open + i),
            _ => {}
        }
    }
    let close = close.ok_or_else(|| "unbalanced '{'".to_string())?;

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    let mut expanded = Vec::new();
    for window in bounds.windows(2) {
        let alternative = &pattern[window[0] + 1..window[1]];
        expanded.extend(expand_braces(&format!("{}{}{}", head, alternative, tail))?);
    }
    Ok(expanded)
}

/// Structural pattern over semantic deltas:
/// `<delta-type|*> [exported|internal] [kind=<symbol-kind>] [severity>=<level>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstPattern {
    source: String,
    delta_type: Option<DeltaType>,
    exported: Option<bool>,
    kind: Option<SymbolKind>,
    min_severity: Option<Severity>,
}

impl AstPattern {
    pub fn parse(pattern: &str) -> Result<Self, String> {
        let mut tokens = pattern.split_whitespace();
        let head = tokens.next().ok_or_else(|| "empty pattern".to_string())?;

        let delta_type = match head {
            "*" => None,
            other => Some(other.parse::<DeltaType>()?),
        };

        let mut parsed = Self {
            source: pattern.trim().to_string(),
            delta_type,
            exported: None,
            kind: None,
            min_severity: None,
        };

        for token in tokens {
            if token == "exported" || token == "internal" {
                if parsed.exported.is_some() {
                    return Err(format!("visibility given twice at '{}'", token));
                }
                parsed.exported = Some(token == "exported");
            } else if let Some(kind) = token.strip_prefix("kind=") {
                if parsed.kind.is_some() {
                    return Err("kind given twice".to_string());
                }
                parsed.kind = Some(kind.parse::<SymbolKind>()?);
            } else if let Some(level) = token.strip_prefix("severity>=") {
                if parsed.min_severity.is_some() {
                    return Err("severity given twice".to_string());
                }
                parsed.min_severity = Some(level.parse::<Severity>()?);
            } else {
                return Err(format!("unexpected term '{}'", token));
            }
        }

        Ok(parsed)
    }

    /// Whether one delta satisfies every term.
    pub fn matches_delta(&self, delta: &SemanticDelta) -> bool {
        self.delta_type.map_or(true, |t| delta.delta_type == t)
            && self.exported.map_or(true, |e| delta.exported == e)
            && self.kind.map_or(true, |k| delta.symbol_kind == Some(k))
            && self.min_severity.map_or(true, |s| delta.severity >= s)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// One condition of a rule or heuristic.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `match`: glob over the full path.
    Glob(Glob),
    /// `matchPath`: glob over leading directory prefixes.
    PathGlob(Glob),
    /// `matchAst`: some delta matches the pattern.
    Ast(AstPattern),
    /// Heuristic expression.
    Expr(Expr),
}

impl Predicate {
    pub fn matches(&self, change: &SemanticChange) -> bool {
        match self {
            Predicate::Glob(glob) => glob.matches_path(change.path()),
            Predicate::PathGlob(glob) => glob.matches_dir_prefix(change.path()),
            Predicate::Ast(pattern) => change.semantic_changes.iter().any(|d| pattern.matches_delta(d)),
            Predicate::Expr(expr) => expr.evaluate(change),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Glob(glob) => write!(f, "match {}", glob.as_str()),
            Predicate::PathGlob(glob) => write!(f, "matchPath {}", glob.as_str()),
            Predicate::Ast(pattern) => write!(f, "matchAst {}", pattern.as_str()),
            Predicate::Expr(expr) => write!(f, "if {}", expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_does_not_cross_separator() {
        let glob = Glob::new("src/*.ts").unwrap();
        assert!(glob.matches_path("src/api.ts"));
        assert!(!glob.matches_path("src/nested/api.ts"));

        let deep = Glob::new("src/**/*.ts").unwrap();
        assert!(deep.matches_path("src/nested/api.ts"));
        assert!(deep.matches_path("src/api.ts"));
    }

    #[test]
    fn test_file_name_patterns() {
        let glob = Glob::new("*.md").unwrap();
        assert!(glob.matches_path("README.md"));
        assert!(glob.matches_path("docs/guide/intro.md"));
        assert!(!glob.matches_path("docs/guide/intro.mdx"));
    }

    #[test]
    fn test_braces() {
        let glob = Glob::new("{*.test.*,*_test.go}").unwrap();
        assert!(glob.matches_path("src/api.test.ts"));
        assert!(glob.matches_path("pkg/server_test.go"));
        assert!(!glob.matches_path("pkg/server.go"));

        assert_eq!(
            expand_braces("a{b,c}d{e,f}").unwrap(),
            vec!["abde", "abdf", "acde", "acdf"]
        );
        assert_eq!(expand_braces("x{a,{b,c}}").unwrap(), vec!["xa", "xb", "xc"]);
        assert!(Glob::new("{a,b").is_err());
        assert!(Glob::new("a}").is_err());
        assert!(Glob::new("[").is_err());
    }

    #[test]
    fn test_dir_prefix() {
        let glob = Glob::new("src/api").unwrap();
        assert!(glob.matches_dir_prefix("src/api/users.ts"));
        assert!(glob.matches_dir_prefix("src/api/v2/users.ts"));
        assert!(!glob.matches_dir_prefix("src/api.ts"));
        assert!(!glob.matches_dir_prefix("lib/src/api/users.ts"));

        let anywhere = Glob::new("**/tests").unwrap();
        assert!(anywhere.matches_dir_prefix("tests/cli.rs"));
        assert!(anywhere.matches_dir_prefix("crates/core/tests/cli.rs"));
        assert!(!anywhere.matches_dir_prefix("src/tests.rs"));
    }

    #[test]
    fn test_ast_pattern_parse() {
        let pattern = AstPattern::parse("signature_changed exported kind=function severity>=high").unwrap();
        assert_eq!(pattern.delta_type, Some(DeltaType::SignatureChanged));
        assert_eq!(pattern.exported, Some(true));
        assert_eq!(pattern.kind, Some(SymbolKind::Function));
        assert_eq!(pattern.min_severity, Some(Severity::High));

        let any = AstPattern::parse("* internal").unwrap();
        assert_eq!(any.delta_type, None);
        assert_eq!(any.exported, Some(false));

        assert!(AstPattern::parse("").is_err());
        assert!(AstPattern::parse("symbol_moved").is_err());
        assert!(AstPattern::parse("* exported internal").is_err());
        assert!(AstPattern::parse("* kind=widget").is_err());
        assert!(AstPattern::parse("* severity>=huge").is_err());
        assert!(AstPattern::parse("* loud").is_err());
    }

    #[test]
    fn test_ast_pattern_matches() {
        let delta = SemanticDelta {
            delta_type: DeltaType::SignatureChanged,
            description: "change signature of fetchUser".to_string(),
            severity: Severity::High,
            affected_symbol: Some("fetchUser".to_string()),
            symbol_kind: Some(SymbolKind::Function),
            exported: true,
        };
        assert!(AstPattern::parse("signature_changed exported").unwrap().matches_delta(&delta));
        assert!(AstPattern::parse("* severity>=medium").unwrap().matches_delta(&delta));
        assert!(!AstPattern::parse("* internal").unwrap().matches_delta(&delta));
        assert!(!AstPattern::parse("* kind=class").unwrap().matches_delta(&delta));
        assert!(!AstPattern::parse("symbol_added").unwrap().matches_delta(&delta));
    }
}
