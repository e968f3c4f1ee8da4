// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, CACHE_FILENAME, HOME_CONFIG_FILENAME, USER_CONFIG_FILENAME};
use anyhow::{Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find the home directory.")]
    HomeDirNotFound,
    #[error("Could not create directory at '{path}': {source}")]
    DirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Candidate user configuration files, in lookup order.
///
/// `$XDG_CONFIG_HOME/dicc/dicc.toml`, then `~/.config/dicc/dicc.toml`, then
/// the platform config dir (when it differs), then `~/.dicc.toml`.
pub fn user_config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|value| !value.is_empty()) {
        candidates.push(PathBuf::from(xdg).join(APP_DIR_NAME).join(USER_CONFIG_FILENAME));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config").join(APP_DIR_NAME).join(USER_CONFIG_FILENAME));
    }
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(APP_DIR_NAME).join(USER_CONFIG_FILENAME);
        if !candidates.contains(&path) {
            candidates.push(path);
        }
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(HOME_CONFIG_FILENAME));
    }

    candidates
}

/// Returns the first candidate that exists as a regular file.
pub fn find_user_config(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}

/// Expands a path template, resolving `~` and environment variables.
pub fn expand_path_template(template: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(template)
        .map_err(|e| anyhow!("Failed to expand path template '{}': {}", template, e))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// The directory holding the response cache.
///
/// A configured template wins; otherwise the platform cache directory
/// (`~/.cache/dicc` on Linux) is used.
pub fn cache_dir(template: Option<&str>) -> Result<PathBuf> {
    match template {
        Some(template) => expand_path_template(template),
        None => {
            let base = match dirs::cache_dir() {
                Some(dir) => dir,
                None => dirs::home_dir()
                    .ok_or(PathError::HomeDirNotFound)?
                    .join(".cache"),
            };
            Ok(base.join(APP_DIR_NAME))
        }
    }
}

/// The cache file inside `dir`, creating `dir` if needed.
pub fn ensure_cache_file(dir: &Path) -> Result<PathBuf, PathError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| PathError::DirCreation {
            path: dir.display().to_string(),
            source: e,
        })?;
    }
    Ok(dir.join(CACHE_FILENAME))
}
