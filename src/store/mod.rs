//! Catalog storage.
//!
//! [`CatalogStore`] is the interface the repository works against. Two
//! strategies implement it:
//!
//! - [`SnapshotCatalog`] keeps the full collection in memory and rewrites a
//!   whole [`Snapshot`] through a [`SnapshotStore`] after every mutation
//!   ([`JsonFileSnapshot`] on disk, [`InMemorySnapshot`] for tests).
//! - `SqliteCatalog` (feature `sqlite`) maps each operation onto a single
//!   statement or transaction; the database assigns ids.
//!
//! ## Example
//!
//! ```ignore
//! use catalog_store::store::{CatalogStore, JsonFileSnapshot, SnapshotCatalog};
//!
//! let store = SnapshotCatalog::open(JsonFileSnapshot::new("products.json"));
//! let product = store.insert(fields, "/images/drill.png".into())?;
//! ```

mod in_memory;
mod json_file;
mod snapshot;
mod snapshot_catalog;
#[cfg(feature = "sqlite")]
mod sqlite;

use crate::error::StorageError;
use crate::product::{Product, ProductFields, ProductId};

pub use in_memory::InMemorySnapshot;
pub use json_file::JsonFileSnapshot;
pub use snapshot::Snapshot;
pub use snapshot_catalog::SnapshotCatalog;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCatalog;

/// Durable product storage. Each call is atomic with respect to the others.
pub trait CatalogStore: Send + Sync {
    /// All products in insertion order.
    fn list(&self) -> Result<Vec<Product>, StorageError>;

    /// Get a product by id. Returns None if not found.
    fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError>;

    /// Assign a fresh id, append the product and commit it.
    fn insert(&self, fields: ProductFields, image: String) -> Result<Product, StorageError>;

    /// Overwrite the product's fields, and its image when one is given.
    /// Returns None if the id is unknown.
    fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
        image: Option<&str>,
    ) -> Result<Option<Product>, StorageError>;

    /// Remove a product. Returns the removed record, or None if the id is unknown.
    fn remove(&self, id: ProductId) -> Result<Option<Product>, StorageError>;
}

impl<T: CatalogStore + ?Sized> CatalogStore for Box<T> {
    fn list(&self) -> Result<Vec<Product>, StorageError> {
        (**self).list()
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        (**self).get(id)
    }

    fn insert(&self, fields: ProductFields, image: String) -> Result<Product, StorageError> {
        (**self).insert(fields, image)
    }

    fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
        image: Option<&str>,
    ) -> Result<Option<Product>, StorageError> {
        (**self).update(id, fields, image)
    }

    fn remove(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        (**self).remove(id)
    }
}

/// Load/commit of a whole catalog snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Load the last committed snapshot. `Ok(None)` means nothing has been
    /// committed yet.
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;

    /// Replace the stored snapshot.
    fn commit(&self, snapshot: &Snapshot) -> Result<(), StorageError>;
}
