// src/core/cache.rs

//! On-disk store of raw API responses, keyed by request URL.
//!
//! The whole store is one file: a bincode-encoded map of records,
//! compressed with LZ4. Each record carries a truncated blake3 digest of its
//! response text, checked on every read.

use crate::{
    constants::{HASH_TRUNCATE_LENGTH, SECONDS_PER_DAY},
    models::{CacheRecord, CacheSettings, QueryMethod},
};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to access cache file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Cache file is empty.")]
    Empty,
    #[error("Failed to decompress cache file. It might be corrupt.")]
    Decompress(#[from] lz4_flex::block::DecompressError),
    #[error("Failed to deserialize cache data. The cache is likely from an incompatible version of `dicc`.")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("Failed to serialize cache data.")]
    Encode(#[from] bincode::error::EncodeError),
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct CacheFile {
    records: BTreeMap<String, CacheRecord>,
}

/// Seconds since the Unix epoch.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Truncated, hex-encoded blake3 digest of a response body.
pub fn content_digest(text: &str) -> String {
    let hash = blake3::hash(text.as_bytes());
    hex::encode(&hash.as_bytes()[..HASH_TRUNCATE_LENGTH])
}

impl CacheRecord {
    pub fn new(
        word: &str,
        method: QueryMethod,
        url: &str,
        response_text: String,
        created: u64,
    ) -> Self {
        let content_hash = content_digest(&response_text);
        Self {
            word: word.to_string(),
            created,
            method,
            url: url.to_string(),
            response_text,
            content_hash,
        }
    }

    /// True when the stored digest still matches the response text.
    pub fn is_intact(&self) -> bool {
        content_digest(&self.response_text) == self.content_hash
    }
}

/// The response cache, loaded in memory and written back with `save`.
#[derive(Debug)]
pub struct ResponseCache {
    path: PathBuf,
    records: BTreeMap<String, CacheRecord>,
    max_size: usize,
    max_age_secs: u64,
    dirty: bool,
}

impl ResponseCache {
    /// Loads the cache at `path`. A missing file is an empty cache; an
    /// unreadable one is discarded with a warning.
    pub fn open(path: &Path, settings: &CacheSettings) -> Result<Self, CacheError> {
        let records = match read_records(path) {
            Ok(records) => records,
            Err(CacheError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!("No cache file at '{}', starting empty.", path.display());
                BTreeMap::new()
            }
            Err(err @ CacheError::Io { .. }) => return Err(err),
            Err(err) => {
                warn!("Discarding unreadable cache '{}': {}", path.display(), err);
                BTreeMap::new()
            }
        };

        debug!("Loaded {} cached responses from '{}'.", records.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            records,
            max_size: settings.max_size,
            max_age_secs: settings.max_age.saturating_mul(SECONDS_PER_DAY),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a fresh, intact record for `url`.
    pub fn get(&self, url: &str) -> Option<&CacheRecord> {
        self.get_at(url, now_secs())
    }

    /// Like `get`, with an explicit clock.
    pub fn get_at(&self, url: &str, now: u64) -> Option<&CacheRecord> {
        let record = self.records.get(url)?;
        if self.is_expired(record, now) {
            trace!("Cache record for '{}' has expired.", url);
            return None;
        }
        if !record.is_intact() {
            warn!("Cache record for '{}' failed its digest check.", url);
            return None;
        }
        Some(record)
    }

    /// Stores `record`, replacing any previous record for the same URL.
    pub fn put(&mut self, record: CacheRecord) {
        trace!("Caching response for '{}'.", record.url);
        self.records.insert(record.url.clone(), record);
        self.dirty = true;
    }

    /// All records, oldest first.
    pub fn records(&self) -> Vec<&CacheRecord> {
        let mut records: Vec<&CacheRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.word.cmp(&b.word)));
        records
    }

    /// Removes every record for `word`, returning how many were removed.
    pub fn remove_word(&mut self, word: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| record.word != word);
        let removed = before - self.records.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Removes every record, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        self.dirty = true;
        removed
    }

    /// Prunes expired records, evicts the oldest beyond `max_size` and writes
    /// the file if anything changed.
    pub fn save(&mut self) -> Result<(), CacheError> {
        self.save_at(now_secs())
    }

    /// Like `save`, with an explicit clock.
    pub fn save_at(&mut self, now: u64) -> Result<(), CacheError> {
        self.prune(now);
        if !self.dirty {
            trace!("Cache unchanged, skipping write.");
            return Ok(());
        }
        write_records(&self.path, &self.records)?;
        self.dirty = false;
        Ok(())
    }

    fn is_expired(&self, record: &CacheRecord, now: u64) -> bool {
        self.max_age_secs > 0 && now.saturating_sub(record.created) > self.max_age_secs
    }

    fn prune(&mut self, now: u64) {
        let before = self.records.len();
        let max_age_secs = self.max_age_secs;
        self.records.retain(|_, record| {
            max_age_secs == 0 || now.saturating_sub(record.created) <= max_age_secs
        });

        if self.max_size > 0 && self.records.len() > self.max_size {
            let excess = self.records.len() - self.max_size;
            let oldest: Vec<String> = self
                .records()
                .into_iter()
                .take(excess)
                .map(|record| record.url.clone())
                .collect();
            for url in oldest {
                self.records.remove(&url);
            }
        }

        let removed = before - self.records.len();
        if removed > 0 {
            debug!("Pruned {} cache records.", removed);
            self.dirty = true;
        }
    }
}

fn read_records(path: &Path) -> Result<BTreeMap<String, CacheRecord>, CacheError> {
    let compressed_bytes = fs::read(path).map_err(|source| CacheError::Io {
        path: path.display().to_string(),
        source,
    })?;
    if compressed_bytes.is_empty() {
        return Err(CacheError::Empty);
    }

    let decompressed_bytes = lz4_flex::decompress_size_prepended(&compressed_bytes)?;
    trace!(
        "Decompressed cache from {} to {} bytes.",
        compressed_bytes.len(),
        decompressed_bytes.len()
    );

    let (file, _): (CacheFile, usize) =
        bincode::serde::decode_from_slice(&decompressed_bytes, bincode::config::standard())?;
    Ok(file.records)
}

fn write_records(path: &Path, records: &BTreeMap<String, CacheRecord>) -> Result<(), CacheError> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|source| CacheError::Io {
            path: parent_dir.display().to_string(),
            source,
        })?;
    }

    let file = CacheFile {
        records: records.clone(),
    };
    let decompressed_bytes = bincode::serde::encode_to_vec(&file, bincode::config::standard())?;
    let compressed_bytes = lz4_flex::compress_prepend_size(&decompressed_bytes);
    trace!(
        "Writing {} cache records ({} bytes compressed).",
        records.len(),
        compressed_bytes.len()
    );

    fs::write(path, &compressed_bytes).map_err(|source| CacheError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // --- Setup ---
    fn settings(max_size: usize, max_age: u64) -> CacheSettings {
        CacheSettings {
            max_size,
            max_age,
            dir: None,
        }
    }

    fn record(word: &str, created: u64) -> CacheRecord {
        CacheRecord::new(
            word,
            QueryMethod::Dictionary,
            &format!("https://example.test/{}", word),
            format!("[\"{}\"]", word),
            created,
        )
    }

    #[test]
    fn test_content_digest_is_truncated_hex() {
        let digest = content_digest("hello world");
        assert_eq!(digest.len(), HASH_TRUNCATE_LENGTH * 2);
        assert_eq!(digest, "d74981efa70a0c880b8d8c1985d075db");
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let cache = ResponseCache::open(&dir.path().join("none.bin"), &settings(10, 30)).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_save_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        let now = now_secs();

        let mut cache = ResponseCache::open(&path, &settings(10, 30)).unwrap();
        cache.put(record("run", now));
        cache.save().unwrap();

        let reopened = ResponseCache::open(&path, &settings(10, 30)).unwrap();
        let hit = reopened.get("https://example.test/run").unwrap();
        assert_eq!(hit.word, "run");
        assert_eq!(hit.response_text, "[\"run\"]");
        assert!(reopened.get("https://example.test/walk").is_none());
    }

    #[test]
    fn test_expired_records_are_absent_and_pruned() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        let now = 100 * SECONDS_PER_DAY;

        let mut cache = ResponseCache::open(&path, &settings(10, 30)).unwrap();
        cache.put(record("old", now - 31 * SECONDS_PER_DAY));
        cache.put(record("new", now - SECONDS_PER_DAY));

        assert!(cache.get_at("https://example.test/old", now).is_none());
        assert!(cache.get_at("https://example.test/new", now).is_some());

        cache.save_at(now).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_oldest_records_are_evicted_beyond_max_size() {
        let dir = tempdir().unwrap();
        let mut cache = ResponseCache::open(&dir.path().join("c.bin"), &settings(2, 0)).unwrap();
        cache.put(record("a", 1));
        cache.put(record("b", 2));
        cache.put(record("c", 3));
        cache.save_at(4).unwrap();

        let words: Vec<&str> = cache.records().iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["b", "c"]);
    }

    #[test]
    fn test_tampered_record_is_absent() {
        let dir = tempdir().unwrap();
        let mut cache = ResponseCache::open(&dir.path().join("c.bin"), &settings(0, 0)).unwrap();
        let mut tampered = record("run", 1);
        tampered.response_text.push_str("garbage");
        cache.put(tampered);

        assert!(cache.get_at("https://example.test/run", 2).is_none());
    }

    #[test]
    fn test_remove_word_and_clear() {
        let dir = tempdir().unwrap();
        let mut cache = ResponseCache::open(&dir.path().join("c.bin"), &settings(0, 0)).unwrap();
        cache.put(record("run", 1));
        cache.put(record("walk", 2));

        assert_eq!(cache.remove_word("run"), 1);
        assert_eq!(cache.remove_word("run"), 0);
        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.bin");
        fs::write(&path, b"not a cache").unwrap();

        let cache = ResponseCache::open(&path, &settings(10, 30)).unwrap();
        assert!(cache.is_empty());
    }
}
