//! InMemoryAssetStore - HashMap-backed asset store for testing and development.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, RwLock};

use super::{check_filename, reference_for, AssetError, AssetStore};

/// In-memory asset store. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryAssetStore {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files.
    pub fn len(&self) -> Result<usize, AssetError> {
        let files = self.files.read().map_err(|_| poisoned())?;
        Ok(files.len())
    }

    pub fn is_empty(&self) -> Result<bool, AssetError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned() -> AssetError {
    AssetError::Io(io::Error::new(io::ErrorKind::Other, "asset lock poisoned"))
}

impl AssetStore for InMemoryAssetStore {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, AssetError> {
        check_filename(filename)?;
        let mut files = self.files.write().map_err(|_| poisoned())?;
        files.insert(filename.to_string(), bytes.to_vec());
        Ok(reference_for(filename))
    }

    fn open(&self, filename: &str) -> Result<Option<Vec<u8>>, AssetError> {
        let files = self.files.read().map_err(|_| poisoned())?;
        Ok(files.get(filename).cloned())
    }
}
