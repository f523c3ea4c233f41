//! Resolver Module
//!
//! Value and field suppliers for bindings.

use std::fmt;
use std::sync::Arc;

use crate::binding::Record;
use crate::error::{KeyCacheError, Result};

type ResolverFn<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

// == Resolver ==
/// Supplies a string from a record: the value a binding stores, or the
/// field name a hash binding writes under.
pub enum Resolver<R> {
    /// Looked up by name through [`Record::attribute`] on every call
    Attribute(String),
    /// Typed accessor captured when the binding is configured
    Func(ResolverFn<R>),
}

impl<R: Record> Resolver<R> {
    /// Resolver reading the named attribute.
    pub fn attribute(name: impl Into<String>) -> Self {
        Resolver::Attribute(name.into())
    }

    /// Resolver calling `f` and formatting its result.
    pub fn from_fn<F, V>(f: F) -> Self
    where
        F: Fn(&R) -> V + Send + Sync + 'static,
        V: fmt::Display,
    {
        Resolver::Func(Arc::new(move |record: &R| f(record).to_string()))
    }

    /// Produces the string for `record`.
    ///
    /// Only attribute resolvers can fail, with `ResolverNotFound` when the
    /// record has no accessor of that name.
    pub fn resolve(&self, record: &R) -> Result<String> {
        match self {
            Resolver::Attribute(name) => record
                .attribute(name)
                .ok_or_else(|| KeyCacheError::ResolverNotFound(name.clone())),
            Resolver::Func(f) => Ok(f(record)),
        }
    }
}

impl<R> Clone for Resolver<R> {
    fn clone(&self) -> Self {
        match self {
            Resolver::Attribute(name) => Resolver::Attribute(name.clone()),
            Resolver::Func(f) => Resolver::Func(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for Resolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolver::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Resolver::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl<R> From<&str> for Resolver<R> {
    fn from(name: &str) -> Self {
        Resolver::Attribute(name.to_string())
    }
}

impl<R> From<String> for Resolver<R> {
    fn from(name: String) -> Self {
        Resolver::Attribute(name)
    }
}
