//! ProductRepository - validated CRUD over a [`CatalogStore`].
//!
//! The repository owns the catalog for the lifetime of the process. It is
//! constructed once at startup and shared with request handlers by handle.

use tracing::{error, info, warn};

use crate::error::{CatalogError, StorageError};
use crate::product::{Product, ProductDraft, ProductFields, ProductId};
use crate::store::CatalogStore;
use crate::validation::{self, ValidationError};

pub struct ProductRepository<S> {
    store: S,
}

impl<S: CatalogStore> ProductRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every product, in insertion order.
    pub fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.store.list().map_err(|e| storage_fault("list", e))
    }

    pub fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .get(id)
            .map_err(|e| storage_fault("get", e))?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Validate `draft` and append it under a fresh id with the given asset.
    ///
    /// A rejected draft changes nothing; an asset already written for it is
    /// left on disk unreferenced.
    pub fn create(&self, draft: &ProductDraft, asset_ref: &str) -> Result<Product, CatalogError> {
        let fields = checked(draft)?;
        self.insert_fields(fields, asset_ref)
    }

    /// Overwrite name, price and category. The image is replaced only when
    /// `asset_ref` is given. Unknown ids are reported before validation.
    pub fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        asset_ref: Option<&str>,
    ) -> Result<Product, CatalogError> {
        self.get(id)?;
        let fields = checked(draft)?;
        self.replace_fields(id, &fields, asset_ref)
    }

    /// Append fields that have already passed validation.
    pub(crate) fn insert_fields(
        &self,
        fields: ProductFields,
        asset_ref: &str,
    ) -> Result<Product, CatalogError> {
        let product = self
            .store
            .insert(fields, asset_ref.to_string())
            .map_err(|e| storage_fault("create", e))?;
        info!(id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Overwrite a record with fields that have already passed validation.
    pub(crate) fn replace_fields(
        &self,
        id: ProductId,
        fields: &ProductFields,
        asset_ref: Option<&str>,
    ) -> Result<Product, CatalogError> {
        let product = self
            .store
            .update(id, fields, asset_ref)
            .map_err(|e| storage_fault("update", e))?
            .ok_or(CatalogError::NotFound(id))?;
        info!(id, image_replaced = asset_ref.is_some(), "product updated");
        Ok(product)
    }

    /// Remove a product and return it. The image file is kept.
    pub fn delete(&self, id: ProductId) -> Result<Product, CatalogError> {
        let product = self
            .store
            .remove(id)
            .map_err(|e| storage_fault("delete", e))?
            .ok_or(CatalogError::NotFound(id))?;
        info!(id, "product deleted");
        Ok(product)
    }
}

/// Validate, logging the rejection.
pub(crate) fn checked(draft: &ProductDraft) -> Result<ProductFields, ValidationError> {
    validation::validate(draft).inspect_err(|e| warn!(field = %e.field, "{}", e.message))
}

fn storage_fault(operation: &'static str, err: StorageError) -> CatalogError {
    error!(operation, error = %err, "catalog storage fault");
    CatalogError::Storage(err)
}
