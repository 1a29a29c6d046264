// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Extension-to-language mapping.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lockfiles and similar manifests that never get structural analysis.
const LOCKFILES: &[&str] = &[
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "Cargo.lock",
    "Gemfile.lock",
    "poetry.lock",
    "Pipfile.lock",
    "composer.lock",
    "go.sum",
    "flake.lock",
];

/// Language or content category of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    TypeScript,
    JavaScript,
    Rust,
    Python,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Shell,
    Markdown,
    Text,
    Json,
    Yaml,
    Toml,
    Html,
    Css,
    Sql,
    Image,
    Lockfile,
    Unknown,
}

impl FileType {
    /// Detect the file type from a path.
    pub fn from_path(path: &str) -> Self {
        let path = Path::new(path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if LOCKFILES.contains(&file_name.as_str()) || file_name.ends_with(".lock") {
            return FileType::Lockfile;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "ts" | "tsx" | "mts" | "cts" => FileType::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => FileType::JavaScript,
            "rs" => FileType::Rust,
            "py" | "pyi" => FileType::Python,
            "go" => FileType::Go,
            "java" | "kt" => FileType::Java,
            "c" | "h" => FileType::C,
            "cc" | "cpp" | "cxx" | "hpp" | "hh" => FileType::Cpp,
            "cs" => FileType::CSharp,
            "rb" => FileType::Ruby,
            "sh" | "bash" | "zsh" => FileType::Shell,
            "md" | "markdown" | "mdx" | "rst" | "adoc" => FileType::Markdown,
            "txt" => FileType::Text,
            "json" | "jsonc" => FileType::Json,
            "yaml" | "yml" => FileType::Yaml,
            "toml" => FileType::Toml,
            "html" | "htm" | "vue" | "svelte" => FileType::Html,
            "css" | "scss" | "sass" | "less" => FileType::Css,
            "sql" => FileType::Sql,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "webp" | "bmp" => FileType::Image,
            _ => match file_name.as_str() {
                "LICENSE" | "CHANGELOG" | "AUTHORS" | "README" => FileType::Text,
                "Makefile" | "Dockerfile" => FileType::Shell,
                _ => FileType::Unknown,
            },
        }
    }

    /// Whether the structural parser understands this file type.
    pub fn is_parseable(&self) -> bool {
        matches!(
            self,
            FileType::TypeScript
                | FileType::JavaScript
                | FileType::Rust
                | FileType::Python
                | FileType::Go
        )
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::TypeScript => "typescript",
            FileType::JavaScript => "javascript",
            FileType::Rust => "rust",
            FileType::Python => "python",
            FileType::Go => "go",
            FileType::Java => "java",
            FileType::C => "c",
            FileType::Cpp => "cpp",
            FileType::CSharp => "csharp",
            FileType::Ruby => "ruby",
            FileType::Shell => "shell",
            FileType::Markdown => "markdown",
            FileType::Text => "text",
            FileType::Json => "json",
            FileType::Yaml => "yaml",
            FileType::Toml => "toml",
            FileType::Html => "html",
            FileType::Css => "css",
            FileType::Sql => "sql",
            FileType::Image => "image",
            FileType::Lockfile => "lockfile",
            FileType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(FileType::from_path("src/api.ts"), FileType::TypeScript);
        assert_eq!(FileType::from_path("lib/index.mjs"), FileType::JavaScript);
        assert_eq!(FileType::from_path("src/main.rs"), FileType::Rust);
        assert_eq!(FileType::from_path("README.md"), FileType::Markdown);
        assert_eq!(FileType::from_path("assets/logo.PNG"), FileType::Image);
        assert_eq!(FileType::from_path("LICENSE"), FileType::Text);
        assert_eq!(FileType::from_path("bin/tool"), FileType::Unknown);
    }

    #[test]
    fn test_lockfiles() {
        assert_eq!(FileType::from_path("package-lock.json"), FileType::Lockfile);
        assert_eq!(FileType::from_path("web/yarn.lock"), FileType::Lockfile);
        assert_eq!(FileType::from_path("Cargo.lock"), FileType::Lockfile);
        assert!(!FileType::Lockfile.is_parseable());
    }

    #[test]
    fn test_parseable() {
        assert!(FileType::TypeScript.is_parseable());
        assert!(FileType::Go.is_parseable());
        assert!(!FileType::Json.is_parseable());
        assert!(!FileType::Markdown.is_parseable());
    }
}
