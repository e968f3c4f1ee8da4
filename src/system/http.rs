// src/system/http.rs

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to '{url}' failed with HTTP status {status}.")]
    Status { url: String, status: u16 },
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Could not read the response body from '{url}': {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Performs a blocking GET and returns the response body.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `Fetcher` backed by a blocking `reqwest` client.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("dicc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {}", redact_key(url));
        // reqwest errors embed the URL, API key included.
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: redact_key(url),
                source: source.without_url(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: redact_key(url),
                status: response.status().as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Body {
            url: redact_key(url),
            source: source.without_url(),
        })
    }
}

/// Hides the API key in URLs that end up in logs and error messages.
pub fn redact_key(url: &str) -> String {
    match url.split_once("key=") {
        Some((before, _)) => format!("{}key=***", before),
        None => url.to_string(),
    }
}
