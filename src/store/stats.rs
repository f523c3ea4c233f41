//! Store Statistics Module
//!
//! Tracks reads, writes and deletes served by the in-memory store.

use serde::Serialize;

// == Store Stats ==
/// Tracks store operation counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    /// Number of GET/HGET calls that found a value
    pub hits: u64,
    /// Number of GET/HGET calls that found nothing
    pub misses: u64,
    /// Number of successful SET/HSET calls
    pub writes: u64,
    /// Number of DEL/HDEL calls that removed something
    pub deletes: u64,
    /// Current number of top-level keys in the store
    pub total_keys: usize,
}

impl StoreStats {
    // == Constructor ==
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the read hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Read ==
    /// Counts a read as a hit or a miss.
    pub fn record_read(&mut self, found: bool) {
        if found {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    // == Record Write ==
    /// Counts one write.
    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    // == Record Delete ==
    /// Counts one delete.
    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    // == Update Key Count ==
    /// Updates the total keys count.
    pub fn set_total_keys(&mut self, count: usize) {
        self.total_keys = count;
    }
}
