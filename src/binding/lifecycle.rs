//! Lifecycle Module
//!
//! Record lifecycle events and the hooks bindings install for them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::binding::Record;
use crate::error::Result;

// == Lifecycle Event ==
/// Points in a record's lifecycle at which bindings synchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// After a successful create or update
    Saved,
    /// After a successful destroy
    Destroyed,
    /// After an update that moved deleted-at from absent to present
    SoftDeleted,
}

impl LifecycleEvent {
    /// Events an update fires, given the deleted-at value before the update.
    ///
    /// Always `Saved`; `SoftDeleted` is added for soft-deletion-aware types
    /// when the update set deleted-at on a record that had none.
    pub fn for_update<R: Record>(
        previous_deleted_at: Option<DateTime<Utc>>,
        record: &R,
    ) -> Vec<Self> {
        let mut events = vec![LifecycleEvent::Saved];
        if R::SOFT_DELETE && soft_delete_transitioned(previous_deleted_at, record.deleted_at()) {
            events.push(LifecycleEvent::SoftDeleted);
        }
        events
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Saved => f.write_str("after_save"),
            LifecycleEvent::Destroyed => f.write_str("after_destroy"),
            LifecycleEvent::SoftDeleted => f.write_str("after_soft_delete"),
        }
    }
}

/// True when deleted-at went from absent to present.
pub fn soft_delete_transitioned(
    previous: Option<DateTime<Utc>>,
    current: Option<DateTime<Utc>>,
) -> bool {
    previous.is_none() && current.is_some()
}

type HookFn<R> = Arc<dyn Fn(&R) -> Result<()> + Send + Sync>;

// == Lifecycle Hook ==
/// One (event, handler) pair the host's lifecycle manager installs.
pub struct LifecycleHook<R> {
    event: LifecycleEvent,
    binding: String,
    handler: HookFn<R>,
}

impl<R> LifecycleHook<R> {
    pub(crate) fn new<F>(event: LifecycleEvent, binding: &str, handler: F) -> Self
    where
        F: Fn(&R) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            event,
            binding: binding.to_string(),
            handler: Arc::new(handler),
        }
    }

    /// Event the hook runs on.
    pub fn event(&self) -> LifecycleEvent {
        self.event
    }

    /// Name of the binding that installed the hook.
    pub fn binding(&self) -> &str {
        &self.binding
    }

    /// Runs the handler for `record`, surfacing any store or resolver error.
    pub fn run(&self, record: &R) -> Result<()> {
        (self.handler)(record)
    }
}

impl<R> Clone for LifecycleHook<R> {
    fn clone(&self) -> Self {
        Self {
            event: self.event,
            binding: self.binding.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<R> fmt::Debug for LifecycleHook<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHook")
            .field("event", &self.event)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
