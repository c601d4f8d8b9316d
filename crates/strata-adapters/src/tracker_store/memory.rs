//! In-memory ledger for tests and dry runs.

use std::sync::{Arc, RwLock};

use strata_core::{
    application::{ApplicationError, ports::TrackerStore},
    domain::MigrationTracker,
    error::StrataResult,
};

/// Thread-safe in-memory ledger. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrackerStore {
    inner: Arc<RwLock<MigrationTracker>>,
}

impl MemoryTrackerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracker(tracker: MigrationTracker) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tracker)),
        }
    }

    /// Current ledger contents (testing helper).
    pub fn snapshot(&self) -> MigrationTracker {
        self.inner.read().map(|t| t.clone()).unwrap_or_default()
    }
}

impl TrackerStore for MemoryTrackerStore {
    fn load(&self) -> StrataResult<MigrationTracker> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.clone())
    }

    fn save(&self, tracker: &MigrationTracker) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        *inner = tracker.clone();
        Ok(())
    }
}
