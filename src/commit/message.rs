// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Conventional commit message structure and formatting.

use crate::config::CommitType;
use serde::Serialize;

/// Maximum subject length in characters.
pub const MAX_SUBJECT_LENGTH: usize = 72;

/// A structured conventional commit message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitMessage {
    /// Commit type (feat, fix, etc.).
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    /// Optional scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Whether this is a breaking change.
    pub breaking: bool,
    /// Optional body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Optional footer (breaking change notes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl CommitMessage {
    /// Create a new commit message. The subject is normalized.
    pub fn new(commit_type: CommitType, subject: &str) -> Self {
        Self {
            commit_type,
            scope: None,
            subject: normalize_subject(subject),
            breaking: false,
            body: None,
            footer: None,
        }
    }

    /// Set the scope.
    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope.filter(|s| !s.is_empty());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body_str = body.into();
        if !body_str.is_empty() {
            self.body = Some(body_str);
        }
        self
    }

    /// Set the footer.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        let footer_str = footer.into();
        if !footer_str.is_empty() {
            self.footer = Some(footer_str);
        }
        self
    }

    /// Set the breaking flag.
    pub fn with_breaking(mut self, breaking: bool) -> Self {
        self.breaking = breaking;
        self
    }

    /// Format the commit message as a string.
    pub fn format(&self) -> String {
        let mut result = self.header();

        if let Some(ref body) = self.body {
            result.push_str("\n\n");
            result.push_str(body);
        }

        if let Some(ref footer) = self.footer {
            result.push_str("\n\n");
            result.push_str(footer);
        }

        result
    }

    /// Get the first line (header) of the commit message.
    pub fn header(&self) -> String {
        let mut result = String::new();
        result.push_str(self.commit_type.as_str());

        if let Some(ref scope) = self.scope {
            result.push('(');
            result.push_str(scope);
            result.push(')');
        }

        if self.breaking {
            result.push('!');
        }

        result.push_str(": ");
        result.push_str(&self.subject);

        result
    }
}

/// Lower-case the first letter, drop trailing periods and cap the length.
pub fn normalize_subject(subject: &str) -> String {
    let trimmed = subject.trim().trim_end_matches('.').trim_end();

    let mut chars = trimmed.chars();
    let mut normalized = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
        None => String::new(),
    };

    if let Some((cut, _)) = normalized.char_indices().nth(MAX_SUBJECT_LENGTH) {
        normalized.truncate(cut);
        normalized = normalized.trim_end().to_string();
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_message_new() {
        let msg = CommitMessage::new(CommitType::Feat, "Add new feature.");
        assert_eq!(msg.commit_type, CommitType::Feat);
        assert_eq!(msg.subject, "add new feature");
        assert!(msg.scope.is_none());
        assert!(!msg.breaking);
    }

    #[test]
    fn test_commit_message_format() {
        let msg = CommitMessage::new(CommitType::Feat, "add feature")
            .with_scope(Some("api".to_string()))
            .with_body("- add fetchUser");

        assert_eq!(msg.format(), "feat(api): add feature\n\n- add fetchUser");
    }

    #[test]
    fn test_commit_message_format_breaking() {
        let msg = CommitMessage::new(CommitType::Fix, "change signature of fetchUser")
            .with_breaking(true)
            .with_footer("BREAKING CHANGE: change signature of fetchUser");

        let formatted = msg.format();
        assert!(formatted.starts_with("fix!: change signature"));
        assert!(formatted.ends_with("BREAKING CHANGE: change signature of fetchUser"));
    }

    #[test]
    fn test_empty_scope_dropped() {
        let msg = CommitMessage::new(CommitType::Docs, "update README.md").with_scope(Some(String::new()));
        assert_eq!(msg.header(), "docs: update README.md");
    }

    #[test]
    fn test_normalize_subject() {
        assert_eq!(normalize_subject("Update README.md..."), "update README.md");
        assert_eq!(normalize_subject("   "), "");
        assert_eq!(normalize_subject("Écrire"), "écrire");

        let long = format!("add {}", "x".repeat(100));
        let normalized = normalize_subject(&long);
        assert_eq!(normalized.chars().count(), MAX_SUBJECT_LENGTH);
    }

    #[test]
    fn test_serialized_shape() {
        let msg = CommitMessage::new(CommitType::Fix, "fix it");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "fix");
        assert_eq!(json["breaking"], false);
        assert!(json.get("scope").is_none());
    }
}
