//! Scalar Binding Module
//!
//! Mirrors one record attribute as a single store value.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::binding::{KeyTemplate, Record, Resolver};
use crate::error::Result;
use crate::store::KeyValueStore;

// == Scalar Binding ==
/// Handle for a binding that stores one value per decoded key.
///
/// Built through [`BindingBuilder::scalar`](crate::binding::BindingBuilder::scalar).
pub struct ScalarBinding<R> {
    name: String,
    template: KeyTemplate,
    value: Resolver<R>,
    synchronize_on_lifecycle: bool,
    store: Arc<dyn KeyValueStore>,
}

impl<R: Record> ScalarBinding<R> {
    pub(crate) fn new(
        name: String,
        template: KeyTemplate,
        value: Resolver<R>,
        synchronize_on_lifecycle: bool,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            name,
            template,
            value,
            synchronize_on_lifecycle,
            store,
        }
    }

    // == Accessors ==
    /// The binding name used for lookup and logging.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw template string, e.g. `profile/:account_id`.
    pub fn key_template(&self) -> &str {
        self.template.as_str()
    }

    /// The parsed key template.
    pub fn template(&self) -> &KeyTemplate {
        &self.template
    }

    /// Whether lifecycle hooks are installed for this binding.
    pub fn synchronizes_on_lifecycle(&self) -> bool {
        self.synchronize_on_lifecycle
    }

    // == Redis Key ==
    /// The decoded store key for `record`, e.g. `profile:42`.
    pub fn redis_key(&self, record: &R) -> Result<String> {
        self.template.decode(record)
    }

    // == Read ==
    /// Current stored value for `record`, or None when nothing is stored.
    pub fn read(&self, record: &R) -> Result<Option<String>> {
        let key = self.redis_key(record)?;
        self.store.get(&key)
    }

    // == Synchronize Write ==
    /// Stores the record's current value under its decoded key.
    pub fn synchronize_write(&self, record: &R) -> Result<()> {
        let key = self.redis_key(record)?;
        let value = self.value.resolve(record)?;
        debug!(binding = %self.name, key = %key, "SET");
        self.store.set(&key, &value)
    }

    // == Synchronize Delete ==
    /// Removes the record's decoded key from the store.
    pub fn synchronize_delete(&self, record: &R) -> Result<()> {
        let key = self.redis_key(record)?;
        debug!(binding = %self.name, key = %key, "DEL");
        self.store.del(&key).map(|_| ())
    }
}

impl<R> fmt::Debug for ScalarBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarBinding")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("value", &self.value)
            .field("synchronize_on_lifecycle", &self.synchronize_on_lifecycle)
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::fixtures::Account;
    use crate::error::KeyCacheError;
    use crate::store::MemoryStore;

    fn tier_binding(store: Arc<MemoryStore>) -> ScalarBinding<Account> {
        ScalarBinding::new(
            "account_tier".to_string(),
            KeyTemplate::parse("account/:id/tier"),
            Resolver::attribute("tier"),
            true,
            store,
        )
    }

    #[test]
    fn test_write_then_read() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = tier_binding(store.clone());
        let account = Account::new(42, "gold");

        binding.synchronize_write(&account).unwrap();

        assert_eq!(binding.read(&account).unwrap(), Some("gold".to_string()));
        assert_eq!(store.get("account:42:tier").unwrap(), Some("gold".to_string()));
    }

    #[test]
    fn test_write_overwrites_previous_value() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = tier_binding(store);
        let mut account = Account::new(42, "gold");

        binding.synchronize_write(&account).unwrap();
        account.tier = "platinum".to_string();
        binding.synchronize_write(&account).unwrap();

        assert_eq!(binding.read(&account).unwrap(), Some("platinum".to_string()));
    }

    #[test]
    fn test_delete_then_read() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = tier_binding(store.clone());
        let account = Account::new(42, "gold");

        binding.synchronize_write(&account).unwrap();
        binding.synchronize_delete(&account).unwrap();

        assert_eq!(binding.read(&account).unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_delete_of_missing_key_is_ok() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = tier_binding(store);

        assert!(binding.synchronize_delete(&Account::new(1, "gold")).is_ok());
    }

    #[test]
    fn test_keys() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = tier_binding(store);
        let account = Account::new(7, "gold");

        assert_eq!(binding.key_template(), "account/:id/tier");
        assert_eq!(binding.redis_key(&account).unwrap(), "account:7:tier");
    }

    #[test]
    fn test_missing_value_resolver_writes_nothing() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = ScalarBinding::new(
            "account_plan".to_string(),
            KeyTemplate::parse("account/:id/plan"),
            Resolver::attribute("plan"),
            true,
            store.clone(),
        );

        let err = binding
            .synchronize_write(&Account::new(1, "gold"))
            .unwrap_err();
        assert_eq!(err, KeyCacheError::ResolverNotFound("plan".to_string()));
        assert!(store.is_empty().unwrap());
    }
}
