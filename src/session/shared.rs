//! Thread-safe handle over a session store
//!
//! `record` and `reset` are serialized through a single mutex, so a reset
//! can never interleave with a record.

use std::sync::{Arc, Mutex, MutexGuard};

use super::store::{TestOutcome, TestSessionStore};
use super::summary::SessionSummary;

/// Cloneable handle to one shared store
#[derive(Debug, Clone, Default)]
pub struct SharedSessionStore {
    inner: Arc<Mutex<TestSessionStore>>,
}

impl SharedSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // The ledger has no invariant a panicking writer could break halfway, so
    // a poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, TestSessionStore> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(&self, test_id: impl Into<String>, passed: bool) {
        self.lock().record(test_id, passed);
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn summary(&self) -> SessionSummary {
        self.lock().summary()
    }

    /// Owned copy of the outcome, since the lock is released on return
    pub fn outcome_for(&self, test_id: &str) -> Option<TestOutcome> {
        self.lock().outcome_for(test_id).cloned()
    }

    /// Run `f` with exclusive access to the store
    pub fn with<R>(&self, f: impl FnOnce(&mut TestSessionStore) -> R) -> R {
        f(&mut self.lock())
    }

    /// Copy of the current store contents
    pub fn to_store(&self) -> TestSessionStore {
        self.lock().clone()
    }
}
