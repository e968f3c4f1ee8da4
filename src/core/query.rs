// src/core/query.rs

use crate::{
    constants::{DICTIONARY_BASE_URL, DICTIONARY_KEY_ENV, THESAURUS_BASE_URL, THESAURUS_KEY_ENV},
    core::cache::{ResponseCache, now_secs},
    models::{ApiSettings, CacheRecord, QueryMethod},
    schema::CollegiateResponse,
    system::http::{Fetcher, redact_key},
};
use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("No API key configured for the {method}. Set `{config_key}` in dicc.toml or the `{env}` environment variable.")]
    MissingApiKey {
        method: QueryMethod,
        config_key: &'static str,
        env: &'static str,
    },
    #[error("Searching the {0} is not supported yet.")]
    Unsupported(QueryMethod),
    #[error("Cannot search for an empty word.")]
    EmptyWord,
}

/// Everything but the RFC 3986 unreserved characters is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One lookup, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub word: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub method: QueryMethod,
    pub url: String,
}

/// Where a processed response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
}

/// `<base>/<word>/?key=<key>`, with the word percent-encoded.
pub fn build_url(word: &str, method: QueryMethod, api_key: &str) -> String {
    let base = match method {
        QueryMethod::Dictionary => DICTIONARY_BASE_URL,
        QueryMethod::Thesaurus => THESAURUS_BASE_URL,
    };
    format!(
        "{}{}/?key={}",
        base,
        utf8_percent_encode(word, UNRESERVED),
        utf8_percent_encode(api_key, UNRESERVED)
    )
}

/// Builds the query for `word`, picking the API key that matches `method`.
pub fn create_query(word: &str, method: QueryMethod, api: &ApiSettings) -> Result<Query, QueryError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(QueryError::EmptyWord);
    }

    let (key, config_key, env) = match method {
        QueryMethod::Dictionary => (&api.dictionary_key, "api.dictionary_key", DICTIONARY_KEY_ENV),
        QueryMethod::Thesaurus => (&api.thesaurus_key, "api.thesaurus_key", THESAURUS_KEY_ENV),
    };
    let key = key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(QueryError::MissingApiKey {
            method,
            config_key,
            env,
        })?;

    Ok(Query {
        word: word.to_string(),
        timestamp: now_secs(),
        method,
        url: build_url(word, method, key),
    })
}

/// Resolves a query: cache first, then the network.
///
/// A fetched body is stored in the cache only after it parsed successfully.
/// The caller is responsible for saving the cache.
pub fn process_query(
    query: &Query,
    cache: &mut ResponseCache,
    fetcher: &dyn Fetcher,
    use_cache: bool,
) -> Result<(CollegiateResponse, ResponseSource)> {
    if query.method == QueryMethod::Thesaurus {
        return Err(QueryError::Unsupported(query.method).into());
    }

    if use_cache && let Some(record) = cache.get(&query.url) {
        log::debug!("Cache hit for '{}'.", query.word);
        let response = CollegiateResponse::from_text(&record.response_text)
            .with_context(|| format!("Cached response for '{}' could not be parsed", query.word))?;
        return Ok((response, ResponseSource::Cache));
    }

    log::debug!("Fetching '{}' from {}.", query.word, redact_key(&query.url));
    let body = fetcher
        .fetch(&query.url)
        .with_context(|| format!("Failed to look up '{}'", query.word))?;
    let response = CollegiateResponse::from_text(&body)
        .with_context(|| format!("The API response for '{}' could not be parsed", query.word))?;

    cache.put(CacheRecord::new(
        &query.word,
        query.method,
        &query.url,
        body,
        query.timestamp,
    ));
    Ok((response, ResponseSource::Network))
}
