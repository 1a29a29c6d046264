// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use crate::config::OutputFormat;
use crate::git::WORKING_TREE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// commitlens - semantic change classification for git diffs
///
/// Analyzes the changes between two revisions, classifies each file as a
/// conventional commit type and suggests a commit message.
#[derive(Parser, Debug)]
#[command(name = "commitlens")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Semantic change classification and commit suggestions", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to run (defaults to analyze if not specified)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository to analyze (defaults to the current directory)
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,

    /// Do not read or write the analysis cache
    #[arg(long, global = true)]
    pub no_cache: bool,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Analyze changes and print the full report (default command)
    Analyze(AnalyzeArgs),

    /// Print only the suggested commit message
    Suggest(RangeArgs),

    /// Validate and list the effective rule set
    Rules(RulesArgs),

    /// Write an example commitlens.toml
    Init(InitArgs),

    /// Print version information
    Version,
}

/// Revision range shared by the analysis commands.
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Base revision
    #[arg(default_value = "HEAD")]
    pub base: String,

    /// Head revision (defaults to the working tree)
    pub head: Option<String>,
}

impl RangeArgs {
    /// Head revision, with the working tree as default.
    pub fn head(&self) -> &str {
        self.head.as_deref().unwrap_or(WORKING_TREE)
    }
}

impl Default for RangeArgs {
    fn default() -> Self {
        Self {
            base: "HEAD".to_string(),
            head: None,
        }
    }
}

/// Arguments for the analyze command.
#[derive(Args, Debug, Default, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Output format (overrides output.format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the rules command.
#[derive(Args, Debug, Default, Clone)]
pub struct RulesArgs {
    /// Rules file to use instead of rules.rules_file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Args, Debug, Default, Clone)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// Command to run, defaulting to `analyze` over `HEAD` and the working tree.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Analyze(AnalyzeArgs::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["commitlens"]);
        match cli.effective_command() {
            Commands::Analyze(args) => {
                assert_eq!(args.range.base, "HEAD");
                assert_eq!(args.range.head(), WORKING_TREE);
                assert!(args.format.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from(["commitlens", "analyze", "main", "feature", "--format", "json"]);
        match cli.command {
            Some(Commands::Analyze(args)) => {
                assert_eq!(args.range.base, "main");
                assert_eq!(args.range.head(), "feature");
                assert_eq!(args.format, Some(OutputFormat::Json));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_parse_suggest() {
        let cli = Cli::parse_from(["commitlens", "suggest", "v1.0.0"]);
        match cli.command {
            Some(Commands::Suggest(range)) => {
                assert_eq!(range.base, "v1.0.0");
                assert!(range.head.is_none());
            }
            _ => panic!("Expected Suggest command"),
        }
    }

    #[test]
    fn test_parse_rules_and_init() {
        let cli = Cli::parse_from(["commitlens", "rules", "--file", "rules.yaml"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Rules(RulesArgs { file: Some(_) }))
        ));

        let cli = Cli::parse_from(["commitlens", "init", "--force"]);
        assert!(matches!(cli.command, Some(Commands::Init(InitArgs { force: true }))));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["commitlens", "analyze", "--debug", "--no-cache", "--repo", "/tmp/x"]);
        assert!(cli.debug);
        assert!(cli.no_cache);
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp/x")));
    }
}
