//! Product records and the candidate payload submitted by clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category assigned when a candidate omits it or sends an empty string.
pub const DEFAULT_CATEGORY: &str = "General";

/// Stable product identifier. Assigned once at creation and never reused.
pub type ProductId = u64;

/// A catalog entry.
///
/// Older snapshots stored the identifier under `_id`; it is accepted as an alias
/// on load, but records are always written back with `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Returns the category to store for a candidate value.
pub fn category_or_default(category: Option<&str>) -> String {
    match category {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => default_category(),
    }
}

/// Candidate fields as received from the client, before validation.
///
/// All values stay textual: the price is parsed by the validator so that
/// non-numeric input is rejected instead of silently becoming zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    /// Form fields the schema does not know about, keyed by field name.
    pub extra: BTreeMap<String, String>,
}

impl ProductDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Assign a text field by its form name.
    ///
    /// `_id`, `id` and `image` are tolerated and ignored: identity is owned by
    /// the store and the image arrives as a file part.
    pub fn set_field(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = Some(value),
            "price" => self.price = Some(value),
            "category" => self.category = Some(value),
            "_id" | "id" | "image" => {}
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }
}

/// The mutable fields of a product after validation and category defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl ProductFields {
    /// Build a full record for the given id and asset reference.
    pub fn into_product(self, id: ProductId, image: String) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            category: self.category,
            image,
        }
    }

    /// Overwrite `product` in place. The image only changes when a new
    /// reference is supplied.
    pub fn apply_to(&self, product: &mut Product, image: Option<&str>) {
        product.name = self.name.clone();
        product.price = self.price;
        product.category = self.category.clone();
        if let Some(image) = image {
            product.image = image.to_string();
        }
    }
}
