use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StorageError;
use crate::product::{Product, ProductFields, ProductId};

/// The full catalog as committed to durable storage.
///
/// `next_id` is the id the next created product receives. It only grows, so
/// ids of deleted products are never handed out again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub next_id: ProductId,
    pub products: Vec<Product>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            next_id: 1,
            products: Vec::new(),
        }
    }
}

/// Accepted on-disk shapes: a bare array from older versions, or the
/// wrapped object (with or without the id counter).
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredShape {
    Bare(Vec<Product>),
    Wrapped {
        products: Vec<Product>,
        #[serde(default)]
        next_id: Option<ProductId>,
    },
}

impl Snapshot {
    /// Build a snapshot from loaded records, repairing the id counter and any
    /// duplicate ids left behind by older writers.
    ///
    /// Fails when the loaded ids leave no room for a fresh one.
    pub fn from_products(
        mut products: Vec<Product>,
        next_id: Option<ProductId>,
    ) -> Result<Self, StorageError> {
        let highest = products.iter().map(|p| p.id).max().unwrap_or(0);
        let mut next_id = next_id.unwrap_or(1).max(successor(highest)?);

        let mut seen = HashSet::with_capacity(products.len());
        for product in &mut products {
            if !seen.insert(product.id) {
                warn!(
                    old_id = product.id,
                    new_id = next_id,
                    name = %product.name,
                    "duplicate product id in snapshot, assigning a fresh id"
                );
                product.id = next_id;
                seen.insert(next_id);
                next_id = successor(next_id)?;
            }
        }

        Ok(Self { next_id, products })
    }

    /// Parse any accepted snapshot shape.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        match serde_json::from_str::<StoredShape>(json)? {
            StoredShape::Bare(products) => Self::from_products(products, None),
            StoredShape::Wrapped { products, next_id } => Self::from_products(products, next_id),
        }
    }

    /// Serialize in the wrapped shape.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Append a product under the next id.
    pub fn insert(&mut self, fields: ProductFields, image: String) -> Result<Product, StorageError> {
        let following = successor(self.next_id)?;
        let product = fields.into_product(self.next_id, image);
        self.next_id = following;
        self.products.push(product.clone());
        Ok(product)
    }

    pub fn update(
        &mut self,
        id: ProductId,
        fields: &ProductFields,
        image: Option<&str>,
    ) -> Option<Product> {
        let product = self.products.iter_mut().find(|p| p.id == id)?;
        fields.apply_to(product, image);
        Some(product.clone())
    }

    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        let index = self.position(id)?;
        Some(self.products.remove(index))
    }
}

fn successor(id: ProductId) -> Result<ProductId, StorageError> {
    id.checked_add(1).ok_or(StorageError::IdsExhausted(id))
}
