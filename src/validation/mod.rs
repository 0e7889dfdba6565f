//! Candidate validation.
//!
//! Rules run in a fixed order and the first failure wins:
//!
//! 1. `name` is present, non-empty and at least [`MIN_NAME_LEN`] characters.
//! 2. `price` is present, numeric, finite and not negative.
//! 3. `category`, when present, is text. Empty is allowed; defaulting to
//!    [`DEFAULT_CATEGORY`](crate::product::DEFAULT_CATEGORY) is done by the
//!    caller after validation.
//! 4. No fields outside the schema.
//!
//! Validation is a pure function of the draft.

use thiserror::Error;

use crate::product::{category_or_default, ProductDraft, ProductFields};

/// Minimum number of characters in a product name.
pub const MIN_NAME_LEN: usize = 3;

/// A single human-readable rule violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
        }
    }

    fn required(field: &str) -> Self {
        Self::new(field, format!("\"{}\" is required", field))
    }
}

/// Check a candidate and return its typed fields with the category defaulted.
pub fn validate(draft: &ProductDraft) -> Result<ProductFields, ValidationError> {
    let name = validate_name(draft.name.as_deref())?;
    let price = validate_price(draft.price.as_deref())?;

    if let Some((field, _)) = draft.extra.iter().next() {
        return Err(ValidationError::new(
            field,
            format!("\"{}\" is not allowed", field),
        ));
    }

    Ok(ProductFields {
        name: name.to_string(),
        price,
        category: category_or_default(draft.category.as_deref()),
    })
}

/// Creation additionally requires an uploaded image.
pub fn require_image<T>(image: Option<T>) -> Result<T, ValidationError> {
    image.ok_or_else(|| ValidationError::required("image"))
}

fn validate_name(name: Option<&str>) -> Result<&str, ValidationError> {
    let name = name.ok_or_else(|| ValidationError::required("name"))?;
    if name.is_empty() {
        return Err(ValidationError::new(
            "name",
            "\"name\" is not allowed to be empty".to_string(),
        ));
    }
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            format!(
                "\"name\" length must be at least {} characters long",
                MIN_NAME_LEN
            ),
        ));
    }
    Ok(name)
}

fn validate_price(price: Option<&str>) -> Result<f64, ValidationError> {
    let raw = price.ok_or_else(|| ValidationError::required("price"))?;
    let not_a_number = || ValidationError::new("price", "\"price\" must be a number".to_string());

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(not_a_number());
    }
    let value: f64 = trimmed.parse().map_err(|_| not_a_number())?;
    if !value.is_finite() {
        return Err(not_a_number());
    }
    if value < 0.0 {
        return Err(ValidationError::new(
            "price",
            "\"price\" must be greater than or equal to 0".to_string(),
        ));
    }
    Ok(value)
}
