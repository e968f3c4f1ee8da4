// src/models.rs

use crate::core::styled_text::Style;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// --- CONFIGURATION MODELS (What is read from `dicc.toml`) ---

/// The fully merged configuration: embedded defaults overlaid with the user file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub style: StyleSheet,
}

/// Credentials and transport options for the Merriam-Webster API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub dictionary_key: Option<String>,
    pub thesaurus_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            dictionary_key: None,
            thesaurus_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Limits of the on-disk response cache.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Maximum number of cached responses. `0` disables the limit.
    #[serde(default)]
    pub max_size: usize,
    /// Maximum age of a cached response, in days. `0` disables expiry.
    #[serde(default)]
    pub max_age: u64,
    /// Optional directory template, e.g. `"~/.cache/dicc"` or `"$XDG_CACHE_HOME/dicc"`.
    pub dir: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_size: 500,
            max_age: 30,
            dir: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub log_level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Flat style tables: `style.display.*` for layout, `style.tags.*` for markup tags.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    #[serde(default)]
    pub display: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl StyleSheet {
    /// Looks up a `style.display` key.
    pub fn display(&self, key: &str) -> Option<Style> {
        lookup(&self.display, "display", key)
    }

    /// Looks up a `style.tags` key.
    pub fn tag(&self, key: &str) -> Option<Style> {
        lookup(&self.tags, "tags", key)
    }
}

fn lookup(table: &BTreeMap<String, String>, table_name: &str, key: &str) -> Option<Style> {
    match table.get(key) {
        Some(descriptor) => Style::parse(descriptor),
        None => {
            log::warn!("No style configured for 'style.{}.{}'.", table_name, key);
            None
        }
    }
}

// --- QUERY MODELS ---

/// Which Merriam-Webster reference a query targets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMethod {
    Dictionary,
    Thesaurus,
}

impl QueryMethod {
    /// Parses the names accepted by `--method`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "collegiate" | "c" | "dictionary" | "d" => Some(Self::Dictionary),
            "thesaurus" | "t" => Some(Self::Thesaurus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Thesaurus => "thesaurus",
        }
    }
}

impl fmt::Display for QueryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- CACHE MODELS ---

/// One cached API response, keyed by its request URL.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub word: String,
    /// Seconds since the Unix epoch.
    pub created: u64,
    pub method: QueryMethod,
    pub url: String,
    pub response_text: String,
    /// Truncated blake3 digest of `response_text`, hex encoded.
    pub content_hash: String,
}
