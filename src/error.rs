use thiserror::Error;

use crate::asset::AssetError;
use crate::product::ProductId;
use crate::validation::ValidationError;

/// Faults raised while reading or committing catalog state.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(String),
    #[error("catalog lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("no product id left after {0}")]
    IdsExhausted(ProductId),
}

/// Errors returned by catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Product not found")]
    NotFound(ProductId),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl CatalogError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Validation(_) => 400,
            CatalogError::NotFound(_) => 404,
            CatalogError::Asset(AssetError::InvalidFilename(_)) => 400,
            CatalogError::Asset(_) => 500,
            CatalogError::Storage(_) => 500,
        }
    }

    /// The message shown to clients. Server-side faults are reported
    /// generically so paths and driver details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            CatalogError::Validation(e) => e.to_string(),
            CatalogError::NotFound(_) => self.to_string(),
            CatalogError::Asset(AssetError::InvalidFilename(_)) => self.to_string(),
            CatalogError::Asset(_) | CatalogError::Storage(_) => {
                "internal storage error".to_string()
            }
        }
    }
}
