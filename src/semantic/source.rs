// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Syntax trees for changed source files, and the per-file deadline.

use crate::analysis::FileType;
use crate::error::AnalysisError;
use std::time::{Duration, Instant};
use tree_sitter::{Language, Node, Parser, Tree};

/// Cooperative per-file deadline.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
    timeout_ms: u64,
}

impl Deadline {
    /// Deadline `timeout_ms` from now. Zero disables it.
    pub fn after_ms(timeout_ms: u64) -> Self {
        let at = (timeout_ms > 0).then(|| Instant::now() + Duration::from_millis(timeout_ms));
        Self { at, timeout_ms }
    }

    /// A deadline that never expires.
    pub fn none() -> Self {
        Self {
            at: None,
            timeout_ms: 0,
        }
    }

    /// Whether the deadline has passed.
    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Fail with a timeout error if the deadline has passed.
    pub fn check(&self, path: &str) -> Result<(), AnalysisError> {
        if self.expired() {
            return Err(AnalysisError::Timeout {
                path: path.to_string(),
                timeout_ms: self.timeout_ms,
            });
        }
        Ok(())
    }
}

/// Grammar for a file. `.tsx` files need the JSX-aware TypeScript grammar.
fn language(path: &str, file_type: FileType) -> Option<Language> {
    let language: Language = match file_type {
        FileType::TypeScript if path.ends_with(".tsx") => tree_sitter_typescript::LANGUAGE_TSX.into(),
        FileType::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        FileType::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        FileType::Rust => tree_sitter_rust::LANGUAGE.into(),
        FileType::Python => tree_sitter_python::LANGUAGE.into(),
        FileType::Go => tree_sitter_go::LANGUAGE.into(),
        _ => return None,
    };
    Some(language)
}

/// Parse `content` into a syntax tree. `Ok(None)` for file types without a
/// grammar; a tree with syntax errors is a parse failure.
pub fn parse_tree(
    path: &str,
    file_type: FileType,
    content: &str,
    deadline: &Deadline,
) -> Result<Option<Tree>, AnalysisError> {
    let Some(language) = language(path, file_type) else {
        return Ok(None);
    };
    deadline.check(path)?;

    let parse_error = |message: String| AnalysisError::Parse {
        path: path.to_string(),
        message,
    };

    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| parse_error(format!("cannot load {} grammar: {}", file_type, e)))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| parse_error("parser produced no tree".to_string()))?;
    deadline.check(path)?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error(root).map_or(1, |node| node.start_position().row + 1);
        return Err(parse_error(format!("syntax error at line {}", line)));
    }

    Ok(Some(tree))
}

/// The first error or missing node, in document order.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    node.children(&mut node.walk()).find_map(first_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(path: &str, content: &str) -> Result<Option<Tree>, AnalysisError> {
        parse_tree(path, FileType::from_path(path), content, &Deadline::none())
    }

    #[test]
    fn test_parses_each_language() {
        for (path, content) in [
            ("a.ts", "export const f = <T,>(x: T): T => x;\n"),
            ("a.tsx", "export const A = () => <p>Don't panic</p>;\n"),
            ("a.js", "const re = /['(]/g;\n"),
            ("a.rs", "fn a<'a>(x: &'a str) -> char { let c = '{'; c }\n"),
            ("a.py", "def f(x):\n    return \"}\"\n"),
            ("a.go", "package a\n\nfunc F() {}\n"),
        ] {
            let tree = parse(path, content).unwrap().unwrap();
            assert!(!tree.root_node().has_error(), "{}", path);
        }
    }

    #[test]
    fn test_no_grammar_for_other_types() {
        assert!(parse("a.json", "{\"a\": 1}").unwrap().is_none());
        assert!(parse("README.md", "# Title\n").unwrap().is_none());
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse("a.ts", "const a = 1;\nexport function broken( {\n").unwrap_err();
        match err {
            AnalysisError::Parse { path, message } => {
                assert_eq!(path, "a.ts");
                assert!(message.starts_with("syntax error at line"), "{}", message);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_deadline() {
        let deadline = Deadline::after_ms(1);
        std::thread::sleep(Duration::from_millis(5));
        assert!(deadline.expired());
        assert!(matches!(
            deadline.check("a.ts"),
            Err(AnalysisError::Timeout { timeout_ms: 1, .. })
        ));
        assert!(!Deadline::none().expired());
        assert!(!Deadline::after_ms(0).expired());
    }

    #[test]
    fn test_expired_deadline_aborts_parse() {
        let deadline = Deadline::after_ms(1);
        std::thread::sleep(Duration::from_millis(5));
        let content = "let x = 1;\n".repeat(500);
        let result = parse_tree("big.ts", FileType::TypeScript, &content, &deadline);
        assert!(matches!(result, Err(AnalysisError::Timeout { .. })));
    }
}
