//! Store Module
//!
//! The key-value store port consumed by bindings, plus an in-memory backend.

mod entry;
mod memory;
mod stats;

use entry::StoreEntry;

use std::collections::BTreeMap;

use crate::error::Result;

// Re-export public types
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Key Value Store ==
/// Primitive operations a binding issues against the external store.
///
/// Implementations must be safe to share across threads; the handle is
/// process-wide and bindings never serialize access to it. Each operation is
/// expected to be atomic on its own. Failures are reported as
/// `StoreUnavailable` or `StoreOperationFailed` and are never retried by the
/// caller.
pub trait KeyValueStore: Send + Sync {
    /// GET: returns the scalar stored at `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// SET: stores `value` at `key`, overwriting any previous scalar.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// DEL: removes `key`. Returns whether anything was removed.
    fn del(&self, key: &str) -> Result<bool>;

    /// HGET: returns `field` of the hash at `key`, if any.
    fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// HSET: stores `value` under `field` of the hash at `key`.
    /// Returns true when the field did not exist before.
    fn hset(&self, key: &str, field: &str, value: &str) -> Result<bool>;

    /// HDEL: removes `field` from the hash at `key`. Returns whether it existed.
    fn hdel(&self, key: &str, field: &str) -> Result<bool>;

    /// HKEYS: all field names of the hash at `key`.
    fn hkeys(&self, key: &str) -> Result<Vec<String>>;

    /// HVALS: all values of the hash at `key`.
    fn hvals(&self, key: &str) -> Result<Vec<String>>;

    /// HGETALL: all field/value pairs of the hash at `key`.
    fn hgetall(&self, key: &str) -> Result<BTreeMap<String, String>>;
}
