//! InMemorySnapshot - volatile snapshot store for testing and development.

use std::sync::{Arc, RwLock};

use super::{Snapshot, SnapshotStore};
use crate::error::StorageError;

/// Keeps the last committed snapshot in memory. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemorySnapshot {
    committed: Arc<RwLock<Option<Snapshot>>>,
}

impl InMemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, as if it had been committed earlier.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            committed: Arc::new(RwLock::new(Some(snapshot))),
        }
    }
}

impl SnapshotStore for InMemorySnapshot {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let committed = self
            .committed
            .read()
            .map_err(|_| StorageError::LockPoisoned("load"))?;
        Ok(committed.clone())
    }

    fn commit(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let mut committed = self
            .committed
            .write()
            .map_err(|_| StorageError::LockPoisoned("commit"))?;
        *committed = Some(snapshot.clone());
        Ok(())
    }
}
