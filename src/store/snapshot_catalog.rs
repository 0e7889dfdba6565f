//! SnapshotCatalog - in-memory catalog committed as a whole after each mutation.

use std::sync::{RwLock, RwLockWriteGuard};

use tracing::{info, warn};

use super::{CatalogStore, Snapshot, SnapshotStore};
use crate::error::StorageError;
use crate::product::{Product, ProductFields, ProductId};

/// Catalog held in memory and mirrored to a [`SnapshotStore`].
///
/// A mutation is applied to a copy of the current state, the copy is
/// committed, and only then does it replace the live state. The write lock is
/// held across the whole sequence, so concurrent mutations are serialized and
/// a failed commit leaves memory and storage at the last committed state.
pub struct SnapshotCatalog<P> {
    snapshots: P,
    state: RwLock<Snapshot>,
}

impl<P: SnapshotStore> SnapshotCatalog<P> {
    /// Load the last committed snapshot.
    ///
    /// Load failures never abort startup: a missing, malformed or
    /// wrongly-shaped snapshot is logged and the catalog starts empty.
    pub fn open(snapshots: P) -> Self {
        let snapshot = match snapshots.load() {
            Ok(Some(snapshot)) => {
                info!(
                    products = snapshot.products.len(),
                    next_id = snapshot.next_id,
                    "loaded catalog snapshot"
                );
                snapshot
            }
            Ok(None) => {
                warn!("no catalog snapshot found, starting with an empty catalog");
                Snapshot::default()
            }
            Err(e) => {
                warn!(error = %e, "could not read catalog snapshot, starting with an empty catalog");
                Snapshot::default()
            }
        };

        Self {
            snapshots,
            state: RwLock::new(snapshot),
        }
    }

    /// The underlying snapshot store.
    pub fn snapshots(&self) -> &P {
        &self.snapshots
    }

    fn read<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Snapshot) -> T,
    ) -> Result<T, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned(operation))?;
        Ok(f(&state))
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, Snapshot>, StorageError> {
        self.state
            .write()
            .map_err(|_| StorageError::LockPoisoned(operation))
    }

    /// Commit `next` and make it the live state.
    fn commit(&self, state: &mut Snapshot, next: Snapshot) -> Result<(), StorageError> {
        self.snapshots.commit(&next)?;
        *state = next;
        Ok(())
    }
}

impl<P: SnapshotStore> CatalogStore for SnapshotCatalog<P> {
    fn list(&self) -> Result<Vec<Product>, StorageError> {
        self.read("list", |s| s.products.clone())
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        self.read("get", |s| s.get(id).cloned())
    }

    fn insert(&self, fields: ProductFields, image: String) -> Result<Product, StorageError> {
        let mut state = self.write("insert")?;
        let mut next = state.clone();
        let product = next.insert(fields, image)?;
        self.commit(&mut state, next)?;
        Ok(product)
    }

    fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
        image: Option<&str>,
    ) -> Result<Option<Product>, StorageError> {
        let mut state = self.write("update")?;
        let mut next = state.clone();
        let Some(product) = next.update(id, fields, image) else {
            return Ok(None);
        };
        self.commit(&mut state, next)?;
        Ok(Some(product))
    }

    fn remove(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let mut state = self.write("remove")?;
        let mut next = state.clone();
        let Some(product) = next.remove(id) else {
            return Ok(None);
        };
        self.commit(&mut state, next)?;
        Ok(Some(product))
    }
}
