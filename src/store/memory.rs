//! Memory Store Module
//!
//! In-process store backend holding scalars and hashes behind a lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::config::Config;
use crate::error::{KeyCacheError, Result};
use crate::store::{KeyValueStore, StoreEntry, StoreStats};

#[derive(Debug, Default)]
struct Inner {
    /// Key-value storage
    entries: HashMap<String, StoreEntry>,
    /// Operation statistics
    stats: StoreStats,
}

// == Memory Store ==
/// Thread-safe in-memory implementation of [`KeyValueStore`].
///
/// Follows the usual Redis type rules: a key holds either a string or a hash,
/// hash operations on a string key (and vice versa for GET) fail, SET
/// replaces whatever the key held, and removing the last field of a hash
/// removes the key.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    /// Maximum number of top-level keys allowed
    max_entries: usize,
    /// Maximum key and field length in bytes
    max_key_length: usize,
    /// Maximum value size in bytes
    max_value_size: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a new MemoryStore with the specified capacity and default limits.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of top-level keys the store can hold
    pub fn new(max_entries: usize) -> Self {
        Self::from_config(&Config {
            max_entries,
            ..Config::default()
        })
    }

    /// Creates a new MemoryStore from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_entries: config.max_entries,
            max_key_length: config.max_key_length,
            max_value_size: config.max_value_size,
        }
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> Result<StoreStats> {
        let inner = self.read_inner()?;
        let mut stats = inner.stats.clone();
        stats.set_total_keys(inner.entries.len());
        Ok(stats)
    }

    // == Length ==
    /// Returns the current number of top-level keys.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_inner()?.entries.len())
    }

    // == Is Empty ==
    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    // == Lock Helpers ==
    fn read_inner(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| KeyCacheError::StoreUnavailable("memory store lock poisoned".to_string()))
    }

    fn write_inner(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| KeyCacheError::StoreUnavailable("memory store lock poisoned".to_string()))
    }

    // == Validation ==
    fn check_key(&self, what: &str, key: &str) -> Result<()> {
        if key.len() > self.max_key_length {
            return Err(KeyCacheError::StoreOperationFailed(format!(
                "{} exceeds maximum length of {} bytes",
                what, self.max_key_length
            )));
        }
        Ok(())
    }

    fn check_value(&self, value: &str) -> Result<()> {
        if value.len() > self.max_value_size {
            return Err(KeyCacheError::StoreOperationFailed(format!(
                "Value exceeds maximum size of {} bytes",
                self.max_value_size
            )));
        }
        Ok(())
    }

    fn check_capacity(&self, inner: &Inner, key: &str) -> Result<()> {
        if !inner.entries.contains_key(key) && inner.entries.len() >= self.max_entries {
            return Err(KeyCacheError::StoreOperationFailed(format!(
                "Store is full ({} keys)",
                self.max_entries
            )));
        }
        Ok(())
    }
}

fn wrong_type(key: &str, entry: &StoreEntry) -> KeyCacheError {
    KeyCacheError::StoreOperationFailed(format!(
        "WRONGTYPE key {} holds a {} value",
        key,
        entry.type_name()
    ))
}

/// Borrows the fields of the hash at `key`, or None when the key is absent.
fn hash_fields<'a>(inner: &'a Inner, key: &str) -> Result<Option<&'a BTreeMap<String, String>>> {
    match inner.entries.get(key) {
        None => Ok(None),
        Some(StoreEntry::Hash(fields)) => Ok(Some(fields)),
        Some(other) => Err(wrong_type(key, other)),
    }
}

impl KeyValueStore for MemoryStore {
    // == Get ==
    fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: reads update the hit/miss counters
        let mut inner = self.write_inner()?;
        let value = match inner.entries.get(key) {
            None => None,
            Some(StoreEntry::Scalar(value)) => Some(value.clone()),
            Some(other) => return Err(wrong_type(key, other)),
        };
        inner.stats.record_read(value.is_some());
        trace!(key, hit = value.is_some(), "GET");
        Ok(value)
    }

    // == Set ==
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_key("Key", key)?;
        self.check_value(value)?;

        let mut inner = self.write_inner()?;
        self.check_capacity(&inner, key)?;

        inner
            .entries
            .insert(key.to_string(), StoreEntry::Scalar(value.to_string()));
        inner.stats.record_write();
        trace!(key, "SET");
        Ok(())
    }

    // == Delete ==
    fn del(&self, key: &str) -> Result<bool> {
        let mut inner = self.write_inner()?;
        let removed = inner.entries.remove(key).is_some();
        if removed {
            inner.stats.record_delete();
        }
        trace!(key, removed, "DEL");
        Ok(removed)
    }

    // == Hash Get ==
    fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut inner = self.write_inner()?;
        let value = hash_fields(&inner, key)?.and_then(|fields| fields.get(field).cloned());
        inner.stats.record_read(value.is_some());
        trace!(key, field, hit = value.is_some(), "HGET");
        Ok(value)
    }

    // == Hash Set ==
    fn hset(&self, key: &str, field: &str, value: &str) -> Result<bool> {
        self.check_key("Key", key)?;
        self.check_key("Field", field)?;
        self.check_value(value)?;

        let mut inner = self.write_inner()?;
        self.check_capacity(&inner, key)?;

        let entry = inner
            .entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::Hash(BTreeMap::new()));
        let created = match entry {
            StoreEntry::Hash(fields) => fields
                .insert(field.to_string(), value.to_string())
                .is_none(),
            other => return Err(wrong_type(key, other)),
        };
        inner.stats.record_write();
        trace!(key, field, created, "HSET");
        Ok(created)
    }

    // == Hash Delete ==
    fn hdel(&self, key: &str, field: &str) -> Result<bool> {
        let mut inner = self.write_inner()?;
        let (removed, now_empty) = match inner.entries.get_mut(key) {
            None => (false, false),
            Some(StoreEntry::Hash(fields)) => {
                let removed = fields.remove(field).is_some();
                (removed, fields.is_empty())
            }
            Some(other) => return Err(wrong_type(key, other)),
        };
        if now_empty {
            inner.entries.remove(key);
        }
        if removed {
            inner.stats.record_delete();
        }
        trace!(key, field, removed, "HDEL");
        Ok(removed)
    }

    // == Hash Keys ==
    fn hkeys(&self, key: &str) -> Result<Vec<String>> {
        let inner = self.read_inner()?;
        Ok(hash_fields(&inner, key)?
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default())
    }

    // == Hash Values ==
    fn hvals(&self, key: &str) -> Result<Vec<String>> {
        let inner = self.read_inner()?;
        Ok(hash_fields(&inner, key)?
            .map(|fields| fields.values().cloned().collect())
            .unwrap_or_default())
    }

    // == Hash Get All ==
    fn hgetall(&self, key: &str) -> Result<BTreeMap<String, String>> {
        let inner = self.read_inner()?;
        Ok(hash_fields(&inner, key)?.cloned().unwrap_or_default())
    }
}
