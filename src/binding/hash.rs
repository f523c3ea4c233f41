//! Hash Binding Module
//!
//! Mirrors one record attribute as a field of a hash shared by a group of
//! records. The decoded key names the group, the field resolver picks the
//! record's field inside it.
//!
//! For soft-deletion-aware record types a record's field exists exactly
//! while the record exists and is not soft-deleted:
//! - writes of a soft-deleted record are skipped,
//! - the soft-delete transition removes the field,
//! - a destroy only removes the field of a record that is soft-deleted.
//!
//! The last rule means a hard destroy of a live record leaves its field in
//! place. That is the established behavior and is kept as is.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::binding::{KeyTemplate, Record, Resolver};
use crate::error::Result;
use crate::store::KeyValueStore;

// == Hash Binding ==
/// Handle for a binding that stores one field per record in a shared hash.
///
/// Built through [`BindingBuilder::hash`](crate::binding::BindingBuilder::hash).
pub struct HashBinding<R> {
    name: String,
    template: KeyTemplate,
    field: Resolver<R>,
    value: Resolver<R>,
    synchronize_on_lifecycle: bool,
    store: Arc<dyn KeyValueStore>,
}

impl<R: Record> HashBinding<R> {
    pub(crate) fn new(
        name: String,
        template: KeyTemplate,
        field: Resolver<R>,
        value: Resolver<R>,
        synchronize_on_lifecycle: bool,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            name,
            template,
            field,
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

    /// The raw template string, e.g. `team/:team_id/roles`.
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

    /// Derived from the record type, never configured.
    pub fn soft_deletion_aware(&self) -> bool {
        R::SOFT_DELETE
    }

    // == Redis Key ==
    /// The decoded hash key for `record`.
    pub fn redis_key(&self, record: &R) -> Result<String> {
        self.template.decode(record)
    }

    /// The field `record` occupies in its hash.
    pub fn field(&self, record: &R) -> Result<String> {
        self.field.resolve(record)
    }

    // == Read ==
    /// Current value of the record's field, or None.
    pub fn read(&self, record: &R) -> Result<Option<String>> {
        let key = self.redis_key(record)?;
        let field = self.field(record)?;
        self.store.hget(&key, &field)
    }

    // == Group Introspection ==
    /// All field names in the record's hash.
    pub fn list_fields(&self, record: &R) -> Result<Vec<String>> {
        self.store.hkeys(&self.redis_key(record)?)
    }

    /// All values in the record's hash.
    pub fn list_values(&self, record: &R) -> Result<Vec<String>> {
        self.store.hvals(&self.redis_key(record)?)
    }

    /// Every field/value pair in the record's hash.
    pub fn snapshot(&self, record: &R) -> Result<BTreeMap<String, String>> {
        self.store.hgetall(&self.redis_key(record)?)
    }

    // == Synchronize Write ==
    /// Writes the record's field unless the record is soft-deleted.
    pub fn synchronize_write(&self, record: &R) -> Result<()> {
        if record.is_soft_deleted() {
            debug!(binding = %self.name, "record soft-deleted, skipping HSET");
            return Ok(());
        }

        let key = self.redis_key(record)?;
        let field = self.field(record)?;
        let value = self.value.resolve(record)?;
        debug!(binding = %self.name, key = %key, field = %field, "HSET");
        self.store.hset(&key, &field, &value).map(|_| ())
    }

    // == Synchronize Delete ==
    /// Removes the record's field.
    ///
    /// For soft-deletion-aware types this only acts on soft-deleted records.
    pub fn synchronize_delete(&self, record: &R) -> Result<()> {
        if R::SOFT_DELETE && !record.is_soft_deleted() {
            debug!(binding = %self.name, "record not soft-deleted, skipping HDEL");
            return Ok(());
        }

        let key = self.redis_key(record)?;
        let field = self.field(record)?;
        debug!(binding = %self.name, key = %key, field = %field, "HDEL");
        self.store.hdel(&key, &field).map(|_| ())
    }
}

impl<R> fmt::Debug for HashBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashBinding")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("field", &self.field)
            .field("value", &self.value)
            .field("synchronize_on_lifecycle", &self.synchronize_on_lifecycle)
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::fixtures::{Account, Membership};
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn role_binding(store: Arc<MemoryStore>) -> HashBinding<Membership> {
        HashBinding::new(
            "team_roles".to_string(),
            KeyTemplate::parse("team/:team_id/roles"),
            Resolver::attribute("user"),
            Resolver::attribute("role"),
            true,
            store,
        )
    }

    fn tier_binding(store: Arc<MemoryStore>) -> HashBinding<Account> {
        HashBinding::new(
            "tiers".to_string(),
            KeyTemplate::parse("tiers"),
            Resolver::from_fn(|a: &Account| a.id),
            Resolver::attribute("tier"),
            true,
            store,
        )
    }

    #[test]
    fn test_write_then_read() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = role_binding(store.clone());
        let alice = Membership::new(1, "alice", "admin");

        binding.synchronize_write(&alice).unwrap();

        assert_eq!(binding.read(&alice).unwrap(), Some("admin".to_string()));
        assert_eq!(
            store.hget("team:1:roles", "alice").unwrap(),
            Some("admin".to_string())
        );
    }

    #[test]
    fn test_fields_are_isolated() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = role_binding(store);
        let alice = Membership::new(1, "alice", "admin");
        let bob = Membership::new(1, "bob", "viewer");

        binding.synchronize_write(&alice).unwrap();
        binding.synchronize_write(&bob).unwrap();

        let snapshot = binding.snapshot(&alice).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["alice"], "admin");
        assert_eq!(snapshot["bob"], "viewer");
        assert_eq!(binding.list_fields(&bob).unwrap(), vec!["alice", "bob"]);
        assert_eq!(binding.list_values(&bob).unwrap(), vec!["admin", "viewer"]);
    }

    #[test]
    fn test_soft_deleted_record_is_not_written() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = role_binding(store.clone());
        let mut alice = Membership::new(1, "alice", "admin");
        alice.deleted_at = Some(Utc::now());

        binding.synchronize_write(&alice).unwrap();

        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_delete_of_soft_deleted_record_removes_field() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = role_binding(store);
        let mut alice = Membership::new(1, "alice", "admin");
        let bob = Membership::new(1, "bob", "viewer");

        binding.synchronize_write(&alice).unwrap();
        binding.synchronize_write(&bob).unwrap();
        alice.deleted_at = Some(Utc::now());
        binding.synchronize_delete(&alice).unwrap();

        assert_eq!(binding.read(&alice).unwrap(), None);
        assert_eq!(binding.list_fields(&bob).unwrap(), vec!["bob"]);
    }

    #[test]
    fn test_delete_of_live_aware_record_is_skipped() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = role_binding(store);
        let alice = Membership::new(1, "alice", "admin");

        binding.synchronize_write(&alice).unwrap();
        binding.synchronize_delete(&alice).unwrap();

        assert_eq!(binding.read(&alice).unwrap(), Some("admin".to_string()));
    }

    #[test]
    fn test_non_aware_delete_removes_field() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = tier_binding(store.clone());
        let account = Account::new(3, "gold");

        assert!(!binding.soft_deletion_aware());
        binding.synchronize_write(&account).unwrap();
        assert_eq!(binding.field(&account).unwrap(), "3");
        binding.synchronize_delete(&account).unwrap();

        assert_eq!(binding.read(&account).unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_keys() {
        let store = Arc::new(MemoryStore::new(100));
        let binding = role_binding(store);
        let alice = Membership::new(12, "alice", "admin");

        assert!(binding.soft_deletion_aware());
        assert_eq!(binding.key_template(), "team/:team_id/roles");
        assert_eq!(binding.redis_key(&alice).unwrap(), "team:12:roles");
    }
}
