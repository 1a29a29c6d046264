// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration loading.

use crate::error::{ConfigError, LensError, Result};
use std::path::{Path, PathBuf};

use super::schema::LensConfig;

/// Configuration file names to search for, in order of priority.
const CONFIG_FILES: &[&str] = &[
    "commitlens.toml",
    ".commitlens.toml",
    ".config/commitlens.toml",
];

/// Find the configuration file in the current directory or parent directories.
pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_config_file_from(&current_dir)
}

/// Find the configuration file starting from a specific directory.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for config_name in CONFIG_FILES {
            let config_path = current.join(config_name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    // XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join("commitlens").join("config.toml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    None
}

/// Load configuration from the default locations.
pub fn load_config() -> Result<LensConfig> {
    match find_config_file() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Ok(LensConfig::default())
        }
    }
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<LensConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(LensError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        LensError::Config(ConfigError::ParseError {
            message: format!("Failed to read config file: {}", e),
        })
    })?;

    let mut config = parse_config(&content)?;

    // A relative rules file is resolved against the config file's directory.
    if let (Some(rules_file), Some(dir)) = (config.rules.rules_file.as_ref(), path.parent()) {
        if rules_file.is_relative() {
            config.rules.rules_file = Some(dir.join(rules_file));
        }
    }

    Ok(config)
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<LensConfig> {
    let config: LensConfig = toml::from_str(content).map_err(|e| {
        LensError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Reject values the pipeline cannot run with.
fn validate_config(config: &LensConfig) -> Result<()> {
    if config.advanced.max_parallel_processes == 0 {
        return Err(LensError::Config(ConfigError::InvalidValue {
            key: "advanced.max_parallel_processes".to_string(),
            message: "must be at least 1".to_string(),
        }));
    }

    if config.analysis.file_analysis_timeout == 0 {
        return Err(LensError::Config(ConfigError::InvalidValue {
            key: "analysis.file_analysis_timeout".to_string(),
            message: "must be greater than zero".to_string(),
        }));
    }

    let weights = [
        ("scoring.lines_of_code", config.scoring.lines_of_code),
        ("scoring.semantic_importance", config.scoring.semantic_importance),
        (
            "scoring.breaking_penalty_bonus",
            config.scoring.breaking_penalty_bonus,
        ),
        ("scoring.dependency_fanout", config.scoring.dependency_fanout),
        ("scoring.breaking_bonus", config.scoring.breaking_bonus),
        (
            "scoring.non_versioning_weight_factor",
            config.scoring.non_versioning_weight_factor,
        ),
    ];
    for (key, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(LensError::Config(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("must be a non-negative number, got {}", value),
            }));
        }
    }

    Ok(())
}
