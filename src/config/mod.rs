// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for commitlens.
//!
//! This module handles loading and parsing the pipeline configuration from
//! commitlens.toml, falling back to defaults.

pub mod default;
mod loader;
mod schema;

pub use loader::{find_config_file, find_config_file_from, load_config, load_config_from, parse_config};
pub use schema::*;
