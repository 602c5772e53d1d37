//! Ambient key/value context consulted by every stack entry capture
//!
//! A [`ContextStore`] holds diagnostic breadcrumbs (request ids, object names,
//! phases of work) that should appear on any error captured while they are set.
//! Callers can own scoped stores and hand them to an
//! [`Annotator`](crate::Annotator), or use the process-wide store through
//! [`set_global_state`], [`clear_global_state`] and [`get_global_state`].
//!
//! Reads take the shared side of an `RwLock` and return an owned copy, so a
//! snapshot never aliases the live map. Writes take the exclusive side.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// Key/value context data, ordered by key
pub type ContextData = BTreeMap<String, String>;

static GLOBAL_STORE: Lazy<Arc<ContextStore>> = Lazy::new(|| Arc::new(ContextStore::new()));

/// Thread-safe string map guarded by a reader/writer lock
#[derive(Debug, Default)]
pub struct ContextStore {
    entries: RwLock<ContextData>,
}

impl ContextStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        trace!(key = %key, "setting context state");
        self.write().insert(key, value.into());
    }

    /// Remove a single key, returning its previous value
    pub fn remove(&self, key: &str) -> Option<String> {
        self.write().remove(key)
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Look up a single key
    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// Return an independent copy of the current state
    ///
    /// The caller may mutate the returned map freely; the store is unaffected.
    pub fn snapshot(&self) -> ContextData {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Every critical section is a single map operation, so a writer that
    // panicked cannot have left the map half-updated. Recover the guard.
    fn read(&self) -> RwLockReadGuard<'_, ContextData> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ContextData> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shared handle to the process-wide store
pub fn global_store() -> Arc<ContextStore> {
    Arc::clone(&GLOBAL_STORE)
}

/// Set a key in the process-wide store
pub fn set_global_state(key: impl Into<String>, value: impl Into<String>) {
    GLOBAL_STORE.set(key, value);
}

/// Remove every key from the process-wide store
pub fn clear_global_state() {
    GLOBAL_STORE.clear();
}

/// Owned copy of the process-wide store
pub fn get_global_state() -> ContextData {
    GLOBAL_STORE.snapshot()
}
