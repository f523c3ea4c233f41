//! Binding Module
//!
//! Declarative mirroring of record attributes into a key-value store.
//!
//! A record type owns a [`BindingRegistry`] holding its bindings. Each
//! binding decodes a [`KeyTemplate`] against a record and writes either a
//! single value ([`ScalarBinding`]) or one field of a shared hash
//! ([`HashBinding`]) whenever the record is saved, and removes it when the
//! record is destroyed.

mod builder;
mod handle;
mod hash;
mod lifecycle;
mod record;
mod registry;
mod resolver;
mod scalar;
mod template;

#[cfg(test)]
mod fixtures;

// Re-export public types
pub use builder::BindingBuilder;
pub use handle::{Binding, BindingKind};
pub use hash::HashBinding;
pub use lifecycle::{soft_delete_transitioned, LifecycleEvent, LifecycleHook};
pub use record::Record;
pub use registry::BindingRegistry;
pub use resolver::Resolver;
pub use scalar::ScalarBinding;
pub use template::{
    decode, KeyTemplate, Segment, KEY_SEPARATOR, PLACEHOLDER_SENTINEL, SEGMENT_SEPARATOR,
};
