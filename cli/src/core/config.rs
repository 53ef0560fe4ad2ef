//! # dirzip Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges, and validates the optional configuration for
//! dirzip. Configuration only tunes *where* archives are written and *how hard*
//! deflate works; entry naming, ordering, and timestamps are fixed and cannot be
//! configured.
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags / environment variables (applied by the caller)
//! 2. Project-specific `.dirzip.toml` in current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [archive]
//! compression_level = 9
//! output_dir = "~/archives"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let level = cfg.archive.compression_level;
//! ```
//!
use crate::core::error::{DirzipError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Highest deflate level accepted in configuration or on the command line.
pub const MAX_COMPRESSION_LEVEL: i64 = 9;

const PROJECT_CONFIG_FILENAME: &str = ".dirzip.toml";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Settings for archive output.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Deflate level, 0 (store-like) to 9 (smallest). `None` uses the library default.
    pub compression_level: Option<i64>,
    /// Directory the archive is written into (can use ~). Defaults to the working directory.
    pub output_dir: Option<String>,
}

/// Loads the user and project configuration files, merges them, expands paths
/// and validates the result. Missing files are not an error.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("org", "dirzip", "dirzip") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.is_file() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
            Ok(None)
        }
    }
}

/// Walks up from `start` looking for `.dirzip.toml`. The search stops at the
/// first directory containing `.git`, after checking that directory itself.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project settings win field by field; anything the project leaves unset
/// falls back to the user file.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project) = project else {
        return user;
    };
    Config {
        archive: ArchiveConfig {
            compression_level: project
                .archive
                .compression_level
                .or(user.archive.compression_level),
            output_dir: project.archive.output_dir.or(user.archive.output_dir),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = config.archive.output_dir.as_mut() {
        *dir = shellexpand::tilde(dir).into_owned();
        debug!("Expanded output directory: {}", dir);
    }
}

/// Checks a deflate level against the accepted range.
pub fn validate_level(level: i64) -> Result<()> {
    if !(0..=MAX_COMPRESSION_LEVEL).contains(&level) {
        return Err(anyhow!(DirzipError::Config(format!(
            "Invalid compression level {}. Expected 0-{}.",
            level, MAX_COMPRESSION_LEVEL
        ))));
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    if let Some(level) = config.archive.compression_level {
        validate_level(level)?;
    }
    if let Some(dir) = &config.archive.output_dir {
        if dir.is_empty() {
            return Err(anyhow!(DirzipError::Config(
                "Configured output directory cannot be empty.".to_string()
            )));
        }
        let out_dir = PathBuf::from(dir);
        if !out_dir.exists() {
            warn!(
                "Configured output directory '{}' does not exist.",
                out_dir.display()
            );
        } else if !out_dir.is_dir() {
            return Err(anyhow!(DirzipError::Config(format!(
                "Configured output path '{}' exists but is not a directory.",
                out_dir.display()
            ))));
        }
    }
    Ok(())
}
