// src/constants.rs

/// The name of the per-user configuration and cache directories.
pub const APP_DIR_NAME: &str = "dicc";

/// The name of the user configuration file (inside the config directory).
pub const USER_CONFIG_FILENAME: &str = "dicc.toml";

/// The name of the fallback configuration file in the home directory.
pub const HOME_CONFIG_FILENAME: &str = ".dicc.toml";

/// The name of the response cache file (inside the cache directory).
pub const CACHE_FILENAME: &str = "responses.cache.bin";

/// Base URL of the Merriam-Webster Collegiate dictionary API.
pub const DICTIONARY_BASE_URL: &str = "https://www.dictionaryapi.com/api/v3/references/collegiate/json/";

/// Base URL of the Merriam-Webster Collegiate thesaurus API.
pub const THESAURUS_BASE_URL: &str = "https://www.dictionaryapi.com/api/v3/references/thesaurus/json/";

pub const DICTIONARY_KEY_ENV: &str = "DICC_DICTIONARY_KEY";
pub const THESAURUS_KEY_ENV: &str = "DICC_THESAURUS_KEY";

/// Number of bytes kept from a blake3 digest before hex encoding.
pub const HASH_TRUNCATE_LENGTH: usize = 16;

/// Console width used when neither `--width` nor `$COLUMNS` is set.
pub const DEFAULT_CONSOLE_WIDTH: usize = 80;

pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
