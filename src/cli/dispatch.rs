// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use crate::config::{default::example_config, find_config_file_from, LensConfig};
use crate::error::{LensError, Result, ResultExt};
use crate::git::GitRepository;
use crate::pipeline::Pipeline;
use crate::report::{render, Report};
use crate::rules::RuleSet;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::args::{AnalyzeArgs, Cli, Commands, InitArgs, RangeArgs, RulesArgs};

const CONFIG_FILE_NAME: &str = "commitlens.toml";

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    match cli.effective_command() {
        Commands::Analyze(args) => run_analyze(&cli, args),
        Commands::Suggest(range) => run_suggest(&cli, range),
        Commands::Rules(args) => run_rules(&cli, args),
        Commands::Init(args) => run_init(&cli, args),
        Commands::Version => run_version(),
    }
}

fn base_dir(cli: &Cli) -> Result<PathBuf> {
    match cli.repo {
        Some(ref repo) => Ok(repo.clone()),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

/// Explicit `--config`, else discovery upward from the repository.
fn load_config(cli: &Cli) -> Result<LensConfig> {
    let mut config = match (&cli.config, &cli.repo) {
        (Some(path), _) => LensConfig::load_from(path)?,
        (None, Some(repo)) => match find_config_file_from(repo) {
            Some(path) => LensConfig::load_from(&path)?,
            None => LensConfig::default(),
        },
        (None, None) => LensConfig::load()?,
    };

    if cli.no_cache {
        config.advanced.cache_results = false;
    }
    Ok(config)
}

fn analyze(cli: &Cli, config: LensConfig, range: &RangeArgs) -> Result<Report> {
    let repo = GitRepository::open(&base_dir(cli)?)?;
    tracing::debug!("Analyzing {} in {}", range.base, repo.workdir().display());

    let spinner = spinner(&format!("Analyzing {}..", range.base));
    let result = Pipeline::new(config, Arc::new(repo)).run(&range.base, range.head());
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result
}

/// Spinner on stderr, only when it is a terminal.
fn spinner(message: &str) -> Option<ProgressBar> {
    if !Term::stderr().is_term() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

/// Run the analyze command.
fn run_analyze(cli: &Cli, args: AnalyzeArgs) -> Result<()> {
    tracing::debug!("Running analyze command with args: {:?}", args);

    let config = load_config(cli)?;
    let format = args.format.unwrap_or(config.output.format);
    let report = analyze(cli, config, &args.range)?;

    print!("{}", render(&report, format)?);
    Ok(())
}

/// Run the suggest command.
fn run_suggest(cli: &Cli, range: RangeArgs) -> Result<()> {
    tracing::debug!("Running suggest command with args: {:?}", range);

    let report = analyze(cli, load_config(cli)?, &range)?;
    match report.commit_message() {
        Some(message) => {
            println!("{}", message);
            Ok(())
        }
        None => Err(LensError::WithContext {
            context: "suggest".to_string(),
            message: "Analysis did not complete".to_string(),
        }),
    }
}

/// Run the rules command.
fn run_rules(cli: &Cli, args: RulesArgs) -> Result<()> {
    tracing::debug!("Running rules command with args: {:?}", args);

    let mut config = load_config(cli)?;
    if let Some(file) = args.file {
        config.rules.rules_file = Some(file);
    }
    let rules = RuleSet::from_config(&config.rules)?;

    for rule in rules.rules() {
        let origin = if rule.builtin { "built-in" } else { "custom" };
        println!(
            "{} {} {}",
            style(&rule.id).bold(),
            style(rule.commit_type.as_str()).cyan(),
            style(format!("({})", origin)).dim()
        );
        for predicate in &rule.predicates {
            println!("    {}", predicate);
        }
        for heuristic in &rule.heuristics {
            println!("    if {} then {}", heuristic.condition, heuristic.set);
        }
    }
    for (earlier, later) in rules.ambiguous_pairs() {
        println!(
            "{} '{}' and '{}' share a path pattern; '{}' applies first",
            style("!").yellow().bold(),
            earlier,
            later,
            earlier
        );
    }
    println!("{} {} rules", style("✓").green(), rules.len());
    Ok(())
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("commitlens {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}

/// Run the init command.
fn run_init(cli: &Cli, args: InitArgs) -> Result<()> {
    tracing::debug!("Running init command with args: {:?}", args);

    let config_path = base_dir(cli)?.join(CONFIG_FILE_NAME);
    write_example_config(&config_path, args.force)?;

    println!("{} Created {}", style("✓").green(), config_path.display());
    Ok(())
}

fn write_example_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(LensError::WithContext {
            context: "init".to_string(),
            message: format!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            ),
        });
    }

    std::fs::write(path, example_config()).context("Failed to write configuration")
}
