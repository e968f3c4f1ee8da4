// src/core/config_loader.rs

//! Loads `Settings`: the embedded defaults with the user's file merged over them.

use crate::{
    constants::{DICTIONARY_KEY_ENV, THESAURUS_KEY_ENV},
    core::paths,
    models::Settings,
};
use anyhow::{Context, Result};
use std::{fs, path::Path};

const DEFAULT_CONFIG: &str = include_str!("../default_config.toml");

/// Loads the configuration from the first user file found, if any, and
/// applies environment overrides.
pub fn load_settings() -> Result<Settings> {
    let user_file = paths::find_user_config(&paths::user_config_candidates());
    let mut settings = load_settings_from(user_file.as_deref())?;
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

/// Merges `user_file` (when given) over the embedded defaults.
pub fn load_settings_from(user_file: Option<&Path>) -> Result<Settings> {
    let mut merged: toml::Table =
        toml::from_str(DEFAULT_CONFIG).context("The embedded default configuration is invalid.")?;

    if let Some(path) = user_file {
        log::debug!("Loading user configuration from '{}'.", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file '{}'", path.display()))?;
        let user: toml::Table = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file '{}'", path.display()))?;
        merge_tables(&mut merged, user);
    } else {
        log::debug!("No user configuration found, using defaults.");
    }

    toml::Value::Table(merged)
        .try_into()
        .context("The merged configuration does not match the expected layout.")
}

/// Deep-merges `overlay` into `base`: tables merge key by key, anything else
/// is replaced.
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                merge_tables(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Fills API keys from the environment. Non-empty variables win over the file.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(DICTIONARY_KEY_ENV).filter(|key| !key.is_empty()) {
        settings.api.dictionary_key = Some(key);
    }
    if let Some(key) = lookup(THESAURUS_KEY_ENV).filter(|key| !key.is_empty()) {
        settings.api.thesaurus_key = Some(key);
    }
}
