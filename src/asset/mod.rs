//! Asset store for uploaded product images.
//!
//! An asset is stored under its original filename and addressed by a
//! reference of the form `/images/<filename>`. Uploading a file with a name
//! that already exists replaces the earlier content; nothing is deduplicated
//! and files are never removed when a product goes away.

mod disk;
mod in_memory;

use thiserror::Error;

pub use disk::DiskAssetStore;
pub use in_memory::InMemoryAssetStore;

/// Public mount path that prefixes every asset reference.
pub const ASSET_MOUNT: &str = "/images";

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("invalid image filename: {0:?}")]
    InvalidFilename(String),
    #[error("asset I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage for binary assets referenced by products.
pub trait AssetStore: Send + Sync {
    /// Persist `bytes` under `filename` and return its public reference.
    ///
    /// The asset is fully written before this returns, so a record that
    /// references it can be committed afterwards.
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, AssetError>;

    /// Read a previously stored asset. Returns `None` if it does not exist.
    fn open(&self, filename: &str) -> Result<Option<Vec<u8>>, AssetError>;
}

/// Build the public reference for a stored filename.
pub fn reference_for(filename: &str) -> String {
    format!("{}/{}", ASSET_MOUNT, filename)
}

/// Reject names that could escape the content directory.
pub fn check_filename(filename: &str) -> Result<(), AssetError> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);
    if bad {
        Err(AssetError::InvalidFilename(filename.to_string()))
    } else {
        Ok(())
    }
}
