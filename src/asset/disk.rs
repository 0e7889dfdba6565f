//! DiskAssetStore - writes assets into a content directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::debug;

use super::{check_filename, reference_for, AssetError, AssetStore};

/// Asset store rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DiskAssetStore {
    dir: PathBuf,
}

impl DiskAssetStore {
    /// Open (creating if needed) the content directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AssetStore for DiskAssetStore {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, AssetError> {
        check_filename(filename)?;

        // Each call stages into its own file, so concurrent uploads under one
        // name each land whole and the last rename wins.
        let mut staging = Builder::new()
            .prefix(".upload-")
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        staging.write_all(bytes)?;
        staging.as_file().sync_all()?;
        staging
            .persist(self.dir.join(filename))
            .map_err(|e| AssetError::Io(e.error))?;

        debug!(file = %filename, bytes = bytes.len(), "stored asset");
        Ok(reference_for(filename))
    }

    fn open(&self, filename: &str) -> Result<Option<Vec<u8>>, AssetError> {
        check_filename(filename)?;
        match fs::read(self.dir.join(filename)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
