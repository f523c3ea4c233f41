//! Key Cache - declarative key-value mirroring for persistent records
//!
//! Keeps a key-value store synchronized with record attributes through
//! templated keys, as scalar values or as fields of shared hashes.

pub mod binding;
pub mod config;
pub mod error;
pub mod store;

pub use binding::{
    decode, Binding, BindingBuilder, BindingKind, BindingRegistry, HashBinding, KeyTemplate,
    LifecycleEvent, LifecycleHook, Record, Resolver, ScalarBinding,
};
pub use config::Config;
pub use error::{KeyCacheError, Result};
pub use store::{KeyValueStore, MemoryStore, StoreStats};
