//! CatalogService - runs a mutation through validation, asset storage and the
//! repository, in that order.
//!
//! Ordering guarantees that an image is fully written before any record
//! referencing it is committed, and that a rejected candidate never causes an
//! image to be written.
//!
//! ## Example
//!
//! ```ignore
//! use catalog_store::{CatalogService, DiskAssetStore, JsonFileSnapshot, SnapshotCatalog, Upload};
//!
//! let service = CatalogService::new(
//!     SnapshotCatalog::open(JsonFileSnapshot::new("products.json")),
//!     DiskAssetStore::new("public/images")?,
//! );
//! let product = service.create(&draft, Some(Upload::new("drill.png", bytes)))?;
//! ```

use tracing::error;

use crate::asset::AssetStore;
use crate::error::CatalogError;
use crate::product::{Product, ProductDraft, ProductId};
use crate::repository::{checked, ProductRepository};
use crate::store::CatalogStore;
use crate::validation;

/// An uploaded file: the client's original filename and its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

pub struct CatalogService<S, A> {
    repository: ProductRepository<S>,
    assets: A,
}

impl<S: CatalogStore, A: AssetStore> CatalogService<S, A> {
    pub fn new(store: S, assets: A) -> Self {
        Self {
            repository: ProductRepository::new(store),
            assets,
        }
    }

    pub fn repository(&self) -> &ProductRepository<S> {
        &self.repository
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn list(&self) -> Result<Vec<Product>, CatalogError> {
        self.repository.list_all()
    }

    pub fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.repository.get(id)
    }

    /// Create a product. An image is required.
    pub fn create(
        &self,
        draft: &ProductDraft,
        image: Option<Upload>,
    ) -> Result<Product, CatalogError> {
        let fields = checked(draft)?;
        let upload = validation::require_image(image)?;
        let asset_ref = self.store_asset(&upload)?;
        self.repository.insert_fields(fields, &asset_ref)
    }

    /// Update a product, replacing its image only when a new one is uploaded.
    pub fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        image: Option<Upload>,
    ) -> Result<Product, CatalogError> {
        self.repository.get(id)?;
        let fields = checked(draft)?;
        let asset_ref = image
            .map(|upload| self.store_asset(&upload))
            .transpose()?;
        self.repository.replace_fields(id, &fields, asset_ref.as_deref())
    }

    pub fn delete(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.repository.delete(id)
    }

    /// Read a stored image by filename.
    pub fn asset(&self, filename: &str) -> Result<Option<Vec<u8>>, CatalogError> {
        Ok(self.assets.open(filename)?)
    }

    fn store_asset(&self, upload: &Upload) -> Result<String, CatalogError> {
        self.assets
            .store(&upload.filename, &upload.bytes)
            .map_err(|e| {
                error!(file = %upload.filename, error = %e, "failed to store image");
                e.into()
            })
    }
}
