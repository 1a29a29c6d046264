// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Heuristic expressions.
//!
//! ```text
//! expr    := and ( "||" and )*
//! and     := unary ( "&&" unary )*
//! unary   := "!" unary | primary
//! primary := "(" expr ")" | fact | metric op integer
//! op      := "==" | "!=" | "<" | "<=" | ">" | ">="
//! ```

use crate::analysis::ChangeStatus;
use crate::semantic::{DeltaType, SemanticChange, Severity};
use std::fmt;

/// A boolean property of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    HasRemovedExportedSymbol,
    HasAddedExportedSymbol,
    HasSignatureChange,
    HasHighSeverity,
    IsNewFile,
    IsDeletedFile,
    IsRenamedFile,
    OnlyAdditions,
    OnlyDeletions,
    HasDependencies,
}

impl Fact {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "has_removed_exported_symbol" => Fact::HasRemovedExportedSymbol,
            "has_added_exported_symbol" => Fact::HasAddedExportedSymbol,
            "has_signature_change" => Fact::HasSignatureChange,
            "has_high_severity" => Fact::HasHighSeverity,
            "is_new_file" => Fact::IsNewFile,
            "is_deleted_file" => Fact::IsDeletedFile,
            "is_renamed_file" => Fact::IsRenamedFile,
            "only_additions" => Fact::OnlyAdditions,
            "only_deletions" => Fact::OnlyDeletions,
            "has_dependencies" => Fact::HasDependencies,
            _ => return None,
        })
    }

    fn holds(&self, change: &SemanticChange) -> bool {
        let deltas = &change.semantic_changes;
        let metadata = &change.context.metadata;
        match self {
            Fact::HasRemovedExportedSymbol => deltas
                .iter()
                .any(|d| d.delta_type == DeltaType::SymbolRemoved && d.exported),
            Fact::HasAddedExportedSymbol => deltas.iter().any(|d| {
                (d.delta_type == DeltaType::SymbolAdded && d.exported)
                    || d.delta_type == DeltaType::SymbolExported
            }),
            Fact::HasSignatureChange => deltas
                .iter()
                .any(|d| d.delta_type == DeltaType::SignatureChanged),
            Fact::HasHighSeverity => deltas.iter().any(|d| d.severity == Severity::High),
            Fact::IsNewFile => change.context.change.status == ChangeStatus::Added,
            Fact::IsDeletedFile => change.context.change.status == ChangeStatus::Deleted,
            Fact::IsRenamedFile => change.context.change.status == ChangeStatus::Renamed,
            Fact::OnlyAdditions => metadata.lines_added > 0 && metadata.lines_removed == 0,
            Fact::OnlyDeletions => metadata.lines_removed > 0 && metadata.lines_added == 0,
            Fact::HasDependencies => !change.context.dependencies.is_empty(),
        }
    }
}

/// A numeric property of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    LinesAdded,
    LinesRemoved,
    LinesChanged,
    Deltas,
    HighSeverityDeltas,
    Dependencies,
    RelatedFiles,
}

impl Metric {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "lines_added" => Metric::LinesAdded,
            "lines_removed" => Metric::LinesRemoved,
            "lines_changed" => Metric::LinesChanged,
            "deltas" => Metric::Deltas,
            "high_severity_deltas" => Metric::HighSeverityDeltas,
            "dependencies" => Metric::Dependencies,
            "related_files" => Metric::RelatedFiles,
            _ => return None,
        })
    }

    fn value(&self, change: &SemanticChange) -> i64 {
        let metadata = &change.context.metadata;
        let value = match self {
            Metric::LinesAdded => metadata.lines_added,
            Metric::LinesRemoved => metadata.lines_removed,
            Metric::LinesChanged => metadata.lines_added + metadata.lines_removed,
            Metric::Deltas => change.semantic_changes.len(),
            Metric::HighSeverityDeltas => change
                .semantic_changes
                .iter()
                .filter(|d| d.severity == Severity::High)
                .count(),
            Metric::Dependencies => change.context.dependencies.len(),
            Metric::RelatedFiles => change.context.related_files.len(),
        };
        i64::try_from(value).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn apply(&self, left: i64, right: i64) -> bool {
        match self {
            CmpOp::Eq => left == right,
            CmpOp::Ne => left != right,
            CmpOp::Lt => left < right,
            CmpOp::Le => left <= right,
            CmpOp::Gt => left > right,
            CmpOp::Ge => left >= right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Fact(Fact),
    Compare(Metric, CmpOp, i64),
    Not(Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
}

impl Node {
    fn evaluate(&self, change: &SemanticChange) -> bool {
        match self {
            Node::Fact(fact) => fact.holds(change),
            Node::Compare(metric, op, value) => op.apply(metric.value(change), *value),
            Node::Not(inner) => !inner.evaluate(change),
            Node::And(left, right) => left.evaluate(change) && right.evaluate(change),
            Node::Or(left, right) => left.evaluate(change) || right.evaluate(change),
        }
    }
}

/// A parsed heuristic expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    source: String,
    root: Node,
}

impl Expr {
    pub fn parse(source: &str) -> Result<Self, String> {
        let tokens = tokenize(source)?;
        let mut parser = Parser { tokens, pos: 0 };
        let root = parser.or()?;
        if let Some(token) = parser.peek() {
            return Err(format!("unexpected {}", token));
        }
        Ok(Self {
            source: source.trim().to_string(),
            root,
        })
    }

    pub fn evaluate(&self, change: &SemanticChange) -> bool {
        self.root.evaluate(change)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Int(i64),
    Op(CmpOp),
    Not,
    And,
    Or,
    Open,
    Close,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Int(value) => write!(f, "'{}'", value),
            Token::Op(op) => write!(f, "operator {:?}", op),
            Token::Not => write!(f, "'!'"),
            Token::And => write!(f, "'&&'"),
            Token::Or => write!(f, "'||'"),
            Token::Open => write!(f, "'('"),
            Token::Close => write!(f, "')'"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            '&' if next == Some('&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if next == Some('|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '=' if next == Some('=') => {
                tokens.push(Token::Op(CmpOp::Eq));
                i += 2;
            }
            '!' if next == Some('=') => {
                tokens.push(Token::Op(CmpOp::Ne));
                i += 2;
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '<' | '>' => {
                let inclusive = next == Some('=');
                let op = match (c, inclusive) {
                    ('<', false) => CmpOp::Lt,
                    ('<', true) => CmpOp::Le,
                    ('>', false) => CmpOp::Gt,
                    _ => CmpOp::Ge,
                };
                tokens.push(Token::Op(op));
                i += if inclusive { 2 } else { 1 };
            }
            c if c.is_ascii_digit() || (c == '-' && next.is_some_and(|n| n.is_ascii_digit())) => {
                let start = i;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<i64>()
                    .map_err(|_| format!("integer out of range: {}", text))?;
                tokens.push(Token::Int(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn or(&mut self) -> Result<Node, String> {
        let mut left = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            left = Node::Or(Box::new(left), Box::new(self.and()?));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Node, String> {
        let mut left = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            left = Node::And(Box::new(left), Box::new(self.unary()?));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Node, String> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(Node::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Node, String> {
        match self.next() {
            Some(Token::Open) => {
                let inner = self.or()?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    Some(token) => Err(format!("expected ')' but found {}", token)),
                    None => Err("missing ')'".to_string()),
                }
            }
            Some(Token::Ident(name)) => {
                if let Some(fact) = Fact::from_name(&name) {
                    return Ok(Node::Fact(fact));
                }
                let metric = Metric::from_name(&name).ok_or_else(|| format!("unknown name '{}'", name))?;
                let op = match self.next() {
                    Some(Token::Op(op)) => op,
                    _ => return Err(format!("'{}' must be compared to an integer", name)),
                };
                match self.next() {
                    Some(Token::Int(value)) => Ok(Node::Compare(metric, op, value)),
                    _ => Err(format!("expected an integer after '{}'", name)),
                }
            }
            Some(token) => Err(format!("unexpected {}", token)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}
