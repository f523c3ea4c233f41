//! Binding Registry Module
//!
//! Holds the ordered bindings of one record type and the lifecycle hooks
//! they install.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::binding::{
    decode, Binding, BindingBuilder, HashBinding, LifecycleEvent, LifecycleHook, Record,
    ScalarBinding,
};
use crate::error::{KeyCacheError, Result};
use crate::store::KeyValueStore;

// == Binding Registry ==
/// Per-record-type set of cache bindings.
///
/// Bindings are registered once while the record type is configured. Each
/// registration validates the binding and, when it synchronizes on the
/// lifecycle, wires its hooks right away. The host either installs
/// [`BindingRegistry::hooks`] in its own lifecycle manager or forwards
/// events to [`BindingRegistry::dispatch`].
///
/// ```ignore
/// let registry = BindingRegistry::new(store)
///     .bind(
///         BindingBuilder::scalar()
///             .name("account_tier")
///             .key("account/:id/tier")
///             .value("tier"),
///     )
///     .bind(
///         BindingBuilder::hash()
///             .name("team_roles")
///             .key("team/:team_id")
///             .field("user")
///             .value("role"),
///     );
///
/// registry.dispatch(LifecycleEvent::Saved, &account)?;
/// ```
pub struct BindingRegistry<R> {
    store: Arc<dyn KeyValueStore>,
    bindings: Vec<Binding<R>>,
    hooks: Vec<LifecycleHook<R>>,
}

impl<R: Record + 'static> BindingRegistry<R> {
    // == Constructor ==
    /// Creates an empty registry whose bindings talk to `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            bindings: Vec::new(),
            hooks: Vec::new(),
        }
    }

    // == Bind ==
    /// Registers a binding, skipping it with a warning when its
    /// configuration is incomplete or its name is already taken.
    pub fn bind(mut self, builder: BindingBuilder<R>) -> Self {
        if let Err(err) = self.try_bind(builder) {
            warn!(error = %err, "cache binding not registered");
        }
        self
    }

    /// Registers a binding, returning why it was rejected.
    pub fn try_bind(&mut self, builder: BindingBuilder<R>) -> Result<()> {
        if let Some(name) = builder.binding_name() {
            if self.get(name).is_some() {
                return Err(KeyCacheError::ConfigurationIncomplete(format!(
                    "binding `{}` is already registered",
                    name
                )));
            }
        }

        let binding = builder.build(Arc::clone(&self.store))?;
        let installed = self.install_hooks(&binding);
        info!(
            binding = binding.name(),
            kind = %binding.kind(),
            template = binding.key_template(),
            hooks = installed,
            "cache binding registered"
        );
        self.bindings.push(binding);
        Ok(())
    }

    fn install_hooks(&mut self, binding: &Binding<R>) -> usize {
        if !binding.synchronizes_on_lifecycle() {
            return 0;
        }

        let before = self.hooks.len();
        match binding {
            Binding::Scalar(scalar) => {
                let writer = Arc::clone(scalar);
                self.hooks.push(LifecycleHook::new(
                    LifecycleEvent::Saved,
                    scalar.name(),
                    move |record: &R| writer.synchronize_write(record),
                ));
                let remover = Arc::clone(scalar);
                self.hooks.push(LifecycleHook::new(
                    LifecycleEvent::Destroyed,
                    scalar.name(),
                    move |record: &R| remover.synchronize_delete(record),
                ));
            }
            Binding::Hash(hash) => {
                let writer = Arc::clone(hash);
                self.hooks.push(LifecycleHook::new(
                    LifecycleEvent::Saved,
                    hash.name(),
                    move |record: &R| writer.synchronize_write(record),
                ));
                let remover = Arc::clone(hash);
                self.hooks.push(LifecycleHook::new(
                    LifecycleEvent::Destroyed,
                    hash.name(),
                    move |record: &R| remover.synchronize_delete(record),
                ));
                if hash.soft_deletion_aware() {
                    let remover = Arc::clone(hash);
                    self.hooks.push(LifecycleHook::new(
                        LifecycleEvent::SoftDeleted,
                        hash.name(),
                        move |record: &R| remover.synchronize_delete(record),
                    ));
                }
            }
        }
        self.hooks.len() - before
    }

    // == Lookup ==
    /// Registered bindings in registration order.
    pub fn bindings(&self) -> &[Binding<R>] {
        &self.bindings
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no binding is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The binding called `name`, of either kind.
    pub fn get(&self, name: &str) -> Option<&Binding<R>> {
        self.bindings.iter().find(|b| b.name() == name)
    }

    /// The scalar binding called `name`, if there is one.
    pub fn scalar(&self, name: &str) -> Option<&ScalarBinding<R>> {
        self.get(name).and_then(Binding::as_scalar)
    }

    /// The hash binding called `name`, if there is one.
    pub fn hash(&self, name: &str) -> Option<&HashBinding<R>> {
        self.get(name).and_then(Binding::as_hash)
    }

    /// (event, handler) pairs to install in the host's lifecycle manager.
    pub fn hooks(&self) -> &[LifecycleHook<R>] {
        &self.hooks
    }

    /// Hooks installed for `event`, in registration order.
    pub fn hooks_for(&self, event: LifecycleEvent) -> impl Iterator<Item = &LifecycleHook<R>> {
        self.hooks.iter().filter(move |hook| hook.event() == event)
    }

    // == Decode ==
    /// Decodes an arbitrary template for `record`.
    pub fn decode_for(&self, record: &R, template: &str) -> Result<String> {
        decode(template, record)
    }

    // == Dispatch ==
    /// Runs every hook installed for `event`, in registration order.
    ///
    /// Stops at the first failing hook and returns its error.
    pub fn dispatch(&self, event: LifecycleEvent, record: &R) -> Result<()> {
        debug!(event = %event, "dispatching cache hooks");
        for hook in self.hooks_for(event) {
            hook.run(record).map_err(|err| {
                warn!(
                    event = %event,
                    binding = hook.binding(),
                    store_error = err.is_store_error(),
                    error = %err,
                    "cache hook failed"
                );
                err
            })?;
        }
        Ok(())
    }

    /// Dispatches the events of an update: `Saved`, plus `SoftDeleted` when
    /// the update set deleted-at on a record that had none.
    pub fn after_update(
        &self,
        previous_deleted_at: Option<DateTime<Utc>>,
        record: &R,
    ) -> Result<()> {
        for event in LifecycleEvent::for_update(previous_deleted_at, record) {
            self.dispatch(event, record)?;
        }
        Ok(())
    }

    // == Warm ==
    /// Mirrors a batch of records through every binding's write path,
    /// including bindings without lifecycle hooks.
    ///
    /// Returns the number of records processed.
    pub fn warm<'a, I>(&self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a R>,
    {
        let mut count = 0;
        for record in records {
            for binding in &self.bindings {
                binding.synchronize_write(record)?;
            }
            count += 1;
        }
        info!(records = count, bindings = self.bindings.len(), "cache warmed");
        Ok(count)
    }
}

impl<R> fmt::Debug for BindingRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("bindings", &self.bindings)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::fixtures::{Account, Membership};
    use crate::store::MemoryStore;

    fn account_registry(store: Arc<MemoryStore>) -> BindingRegistry<Account> {
        BindingRegistry::new(store).bind(
            BindingBuilder::scalar()
                .name("account_tier")
                .key("account/:id/tier")
                .value("tier"),
        )
    }

    fn membership_registry(store: Arc<MemoryStore>) -> BindingRegistry<Membership> {
        BindingRegistry::new(store).bind(
            BindingBuilder::hash()
                .name("team_roles")
                .key("team/:team_id/roles")
                .field("user")
                .value("role"),
        )
    }

    #[test]
    fn test_hooks_installed_per_kind() {
        let store = Arc::new(MemoryStore::new(100));

        let accounts = account_registry(store.clone());
        let events: Vec<_> = accounts.hooks().iter().map(|h| h.event()).collect();
        assert_eq!(events, vec![LifecycleEvent::Saved, LifecycleEvent::Destroyed]);

        let memberships = membership_registry(store);
        let events: Vec<_> = memberships.hooks().iter().map(|h| h.event()).collect();
        assert_eq!(
            events,
            vec![
                LifecycleEvent::Saved,
                LifecycleEvent::Destroyed,
                LifecycleEvent::SoftDeleted
            ]
        );
        assert!(memberships.hooks().iter().all(|h| h.binding() == "team_roles"));
    }

    #[test]
    fn test_incomplete_binding_is_skipped() {
        let store = Arc::new(MemoryStore::new(100));
        let registry = BindingRegistry::<Account>::new(store)
            .bind(BindingBuilder::scalar().name("no_key").value("tier"))
            .bind(BindingBuilder::scalar().key("account/:id").value("tier"))
            .bind(BindingBuilder::hash().name("no_field").key("k").value("tier"));

        assert!(registry.is_empty());
        assert!(registry.hooks().is_empty());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let store = Arc::new(MemoryStore::new(100));
        let mut registry = account_registry(store);

        let result = registry.try_bind(
            BindingBuilder::scalar()
                .name("account_tier")
                .key("other/:id")
                .value("tier"),
        );

        assert!(matches!(result, Err(KeyCacheError::ConfigurationIncomplete(_))));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.hooks().len(), 2);
    }

    #[test]
    fn test_manual_binding_installs_no_hooks() {
        let store = Arc::new(MemoryStore::new(100));
        let registry = BindingRegistry::<Account>::new(store.clone()).bind(
            BindingBuilder::scalar()
                .name("account_tier")
                .key("account/:id/tier")
                .value("tier")
                .synchronize_on_lifecycle(false),
        );
        let account = Account::new(1, "gold");

        assert_eq!(registry.len(), 1);
        assert!(registry.hooks().is_empty());

        registry.dispatch(LifecycleEvent::Saved, &account).unwrap();
        assert!(store.is_empty().unwrap());

        let binding = registry.scalar("account_tier").unwrap();
        binding.synchronize_write(&account).unwrap();
        assert_eq!(binding.read(&account).unwrap(), Some("gold".to_string()));
    }

    #[test]
    fn test_dispatch_save_and_destroy() {
        let store = Arc::new(MemoryStore::new(100));
        let registry = account_registry(store.clone());
        let account = Account::new(42, "gold");

        registry.dispatch(LifecycleEvent::Saved, &account).unwrap();
        assert_eq!(store.get("account:42:tier").unwrap(), Some("gold".to_string()));

        registry.dispatch(LifecycleEvent::Destroyed, &account).unwrap();
        assert_eq!(store.get("account:42:tier").unwrap(), None);
    }

    #[test]
    fn test_after_update_soft_delete_removes_field() {
        let store = Arc::new(MemoryStore::new(100));
        let registry = membership_registry(store);
        let mut alice = Membership::new(1, "alice", "admin");

        registry.dispatch(LifecycleEvent::Saved, &alice).unwrap();
        let roles = registry.hash("team_roles").unwrap();
        assert_eq!(roles.read(&alice).unwrap(), Some("admin".to_string()));

        let previous = alice.deleted_at;
        alice.deleted_at = Some(Utc::now());
        registry.after_update(previous, &alice).unwrap();
        assert_eq!(roles.read(&alice).unwrap(), None);

        // A later update that does not undelete keeps the field out
        let previous = alice.deleted_at;
        alice.role = "owner".to_string();
        registry.after_update(previous, &alice).unwrap();
        assert_eq!(roles.read(&alice).unwrap(), None);
    }

    #[test]
    fn test_lookup() {
        let store = Arc::new(MemoryStore::new(100));
        let registry = account_registry(store);

        assert!(registry.scalar("account_tier").is_some());
        assert!(registry.hash("account_tier").is_none());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_decode_for() {
        let store = Arc::new(MemoryStore::new(100));
        let registry = account_registry(store);
        let account = Account::new(8, "gold");

        assert_eq!(registry.decode_for(&account, "x/:id").unwrap(), "x:8");
        assert!(matches!(
            registry.decode_for(&account, "x/:nope"),
            Err(KeyCacheError::ResolverNotFound(_))
        ));
    }

    #[test]
    fn test_warm_writes_all_bindings() {
        let store = Arc::new(MemoryStore::new(100));
        let registry = BindingRegistry::<Account>::new(store.clone())
            .bind(
                BindingBuilder::scalar()
                    .name("account_tier")
                    .key("account/:id/tier")
                    .value("tier")
                    .synchronize_on_lifecycle(false),
            )
            .bind(
                BindingBuilder::hash()
                    .name("tiers")
                    .key("tiers")
                    .field("id")
                    .value("tier"),
            );
        let accounts = vec![Account::new(1, "gold"), Account::new(2, "silver")];

        assert_eq!(registry.warm(&accounts).unwrap(), 2);

        assert_eq!(store.get("account:2:tier").unwrap(), Some("silver".to_string()));
        assert_eq!(store.hkeys("tiers").unwrap(), vec!["1", "2"]);
    }
}
