//! Store Entry Module
//!
//! Defines the values held by the in-memory store.

use std::collections::BTreeMap;

// == Store Entry ==
/// A single top-level store value, either a scalar or a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEntry {
    /// Plain string value written by SET
    Scalar(String),
    /// Field map written by HSET
    Hash(BTreeMap<String, String>),
}

impl StoreEntry {
    /// Type name reported in WRONGTYPE-style errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            StoreEntry::Scalar(_) => "string",
            StoreEntry::Hash(_) => "hash",
        }
    }
}
