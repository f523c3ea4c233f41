//! Configuration Module
//!
//! Loads store limits from environment variables.

use std::env;

/// Default capacity of the in-memory store
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default maximum key or hash field length in bytes
pub const DEFAULT_MAX_KEY_LENGTH: usize = 256;

/// Default maximum value size in bytes
pub const DEFAULT_MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of top-level keys the store can hold
    pub max_entries: usize,
    /// Maximum key (and hash field) length in bytes
    pub max_key_length: usize,
    /// Maximum value size in bytes
    pub max_value_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum store keys (default: 10000)
    /// - `MAX_KEY_LENGTH` - Maximum key length in bytes (default: 256)
    /// - `MAX_VALUE_SIZE` - Maximum value size in bytes (default: 1048576)
    pub fn from_env() -> Self {
        Self {
            max_entries: parse_var("MAX_ENTRIES", DEFAULT_MAX_ENTRIES),
            max_key_length: parse_var("MAX_KEY_LENGTH", DEFAULT_MAX_KEY_LENGTH),
            max_value_size: parse_var("MAX_VALUE_SIZE", DEFAULT_MAX_VALUE_SIZE),
        }
    }
}

fn parse_var(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }
}
