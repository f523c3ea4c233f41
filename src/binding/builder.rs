//! Binding Builder Module
//!
//! Validates binding configuration and produces typed handles.

use std::fmt;
use std::sync::Arc;

use crate::binding::{
    Binding, BindingKind, HashBinding, KeyTemplate, Record, Resolver, ScalarBinding,
};
use crate::error::{KeyCacheError, Result};
use crate::store::KeyValueStore;

// == Binding Builder ==
/// Collects the configuration of one binding.
///
/// ```ignore
/// let tier = BindingBuilder::<Account>::scalar()
///     .name("account_tier")
///     .key("account/:id/tier")
///     .value("tier");
///
/// let roles = BindingBuilder::<Membership>::hash()
///     .name("team_roles")
///     .key("team/:team_id/roles")
///     .field("user")
///     .value_fn(|m: &Membership| m.role.clone());
/// ```
pub struct BindingBuilder<R> {
    kind: BindingKind,
    name: Option<String>,
    key: Option<String>,
    value: Option<Resolver<R>>,
    field: Option<Resolver<R>>,
    synchronize_on_lifecycle: bool,
}

impl<R: Record> BindingBuilder<R> {
    // == Constructors ==
    /// Starts a scalar binding.
    pub fn scalar() -> Self {
        Self::with_kind(BindingKind::Scalar)
    }

    /// Starts a hash binding.
    pub fn hash() -> Self {
        Self::with_kind(BindingKind::Hash)
    }

    fn with_kind(kind: BindingKind) -> Self {
        Self {
            kind,
            name: None,
            key: None,
            value: None,
            field: None,
            synchronize_on_lifecycle: true,
        }
    }

    // == Setters ==
    /// Identifying name of the binding.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Key template, e.g. `profile/:account_id`.
    pub fn key(mut self, template: impl Into<String>) -> Self {
        self.key = Some(template.into());
        self
    }

    /// Supplier of the stored value; a `&str` names an attribute.
    pub fn value(mut self, resolver: impl Into<Resolver<R>>) -> Self {
        self.value = Some(resolver.into());
        self
    }

    /// Value supplier from a closure over the record.
    pub fn value_fn<F, V>(self, f: F) -> Self
    where
        F: Fn(&R) -> V + Send + Sync + 'static,
        V: fmt::Display,
    {
        self.value(Resolver::from_fn(f))
    }

    /// Supplier of the hash field name. Ignored by scalar bindings.
    pub fn field(mut self, resolver: impl Into<Resolver<R>>) -> Self {
        self.field = Some(resolver.into());
        self
    }

    /// Field name supplier from a closure over the record.
    pub fn field_fn<F, V>(self, f: F) -> Self
    where
        F: Fn(&R) -> V + Send + Sync + 'static,
        V: fmt::Display,
    {
        self.field(Resolver::from_fn(f))
    }

    /// Whether the binding installs lifecycle hooks (default true).
    pub fn synchronize_on_lifecycle(mut self, enabled: bool) -> Self {
        self.synchronize_on_lifecycle = enabled;
        self
    }

    // == Accessors ==
    /// Scalar or hash.
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// The configured name, if any.
    pub fn binding_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // == Validate ==
    /// Checks that every required field is present and non-blank.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if is_blank(&self.name) {
            missing.push("name");
        }
        if is_blank(&self.key) {
            missing.push("key");
        }
        if self.value.is_none() {
            missing.push("value");
        }
        if self.kind == BindingKind::Hash && self.field.is_none() {
            missing.push("field");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(KeyCacheError::ConfigurationIncomplete(format!(
                "{} binding `{}` is missing {}",
                self.kind,
                self.name.as_deref().unwrap_or("<unnamed>"),
                missing.join(", ")
            )))
        }
    }

    // == Build ==
    /// Validates the configuration and creates the binding against `store`.
    pub fn build(self, store: Arc<dyn KeyValueStore>) -> Result<Binding<R>> {
        self.validate()?;

        let sync = self.synchronize_on_lifecycle;
        match (self.kind, self.name, self.key, self.value, self.field) {
            (BindingKind::Scalar, Some(name), Some(key), Some(value), _) => Ok(Binding::Scalar(
                Arc::new(ScalarBinding::new(name, KeyTemplate::parse(key), value, sync, store)),
            )),
            (BindingKind::Hash, Some(name), Some(key), Some(value), Some(field)) => {
                Ok(Binding::Hash(Arc::new(HashBinding::new(
                    name,
                    KeyTemplate::parse(key),
                    field,
                    value,
                    sync,
                    store,
                ))))
            }
            (kind, name, ..) => Err(KeyCacheError::ConfigurationIncomplete(format!(
                "{} binding `{}` is incomplete",
                kind,
                name.unwrap_or_default()
            ))),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl<R> fmt::Debug for BindingBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingBuilder")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("key", &self.key)
            .field("value", &self.value)
            .field("field", &self.field)
            .field("synchronize_on_lifecycle", &self.synchronize_on_lifecycle)
            .finish()
    }
}
