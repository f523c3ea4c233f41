//! Binding Handle Module
//!
//! Kind-erased view over scalar and hash bindings.

use std::fmt;
use std::sync::Arc;

use crate::binding::{HashBinding, Record, ScalarBinding};
use crate::error::Result;

// == Binding Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Scalar,
    Hash,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Scalar => f.write_str("scalar"),
            BindingKind::Hash => f.write_str("hash"),
        }
    }
}

// == Binding ==
/// A configured binding of either kind.
///
/// The inner handles are reference counted so lifecycle hooks can hold on
/// to them independently of the registry.
pub enum Binding<R> {
    Scalar(Arc<ScalarBinding<R>>),
    Hash(Arc<HashBinding<R>>),
}

impl<R: Record> Binding<R> {
    /// Scalar or hash.
    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Scalar(_) => BindingKind::Scalar,
            Binding::Hash(_) => BindingKind::Hash,
        }
    }

    /// The binding name.
    pub fn name(&self) -> &str {
        match self {
            Binding::Scalar(b) => b.name(),
            Binding::Hash(b) => b.name(),
        }
    }

    /// The raw template string.
    pub fn key_template(&self) -> &str {
        match self {
            Binding::Scalar(b) => b.key_template(),
            Binding::Hash(b) => b.key_template(),
        }
    }

    /// Whether lifecycle hooks are installed.
    pub fn synchronizes_on_lifecycle(&self) -> bool {
        match self {
            Binding::Scalar(b) => b.synchronizes_on_lifecycle(),
            Binding::Hash(b) => b.synchronizes_on_lifecycle(),
        }
    }

    /// The decoded store key for `record`.
    pub fn redis_key(&self, record: &R) -> Result<String> {
        match self {
            Binding::Scalar(b) => b.redis_key(record),
            Binding::Hash(b) => b.redis_key(record),
        }
    }

    /// The stored scalar, or the record's field in the hash.
    pub fn read(&self, record: &R) -> Result<Option<String>> {
        match self {
            Binding::Scalar(b) => b.read(record),
            Binding::Hash(b) => b.read(record),
        }
    }

    /// Mirrors `record` into the store.
    pub fn synchronize_write(&self, record: &R) -> Result<()> {
        match self {
            Binding::Scalar(b) => b.synchronize_write(record),
            Binding::Hash(b) => b.synchronize_write(record),
        }
    }

    /// Removes `record`'s entry from the store.
    pub fn synchronize_delete(&self, record: &R) -> Result<()> {
        match self {
            Binding::Scalar(b) => b.synchronize_delete(record),
            Binding::Hash(b) => b.synchronize_delete(record),
        }
    }

    /// The scalar handle, if this is a scalar binding.
    pub fn as_scalar(&self) -> Option<&ScalarBinding<R>> {
        match self {
            Binding::Scalar(b) => Some(&**b),
            Binding::Hash(_) => None,
        }
    }

    /// The hash handle, if this is a hash binding.
    pub fn as_hash(&self) -> Option<&HashBinding<R>> {
        match self {
            Binding::Hash(b) => Some(&**b),
            Binding::Scalar(_) => None,
        }
    }
}

impl<R> Clone for Binding<R> {
    fn clone(&self) -> Self {
        match self {
            Binding::Scalar(b) => Binding::Scalar(Arc::clone(b)),
            Binding::Hash(b) => Binding::Hash(Arc::clone(b)),
        }
    }
}

impl<R> fmt::Debug for Binding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Scalar(b) => fmt::Debug::fmt(b, f),
            Binding::Hash(b) => fmt::Debug::fmt(b, f),
        }
    }
}
