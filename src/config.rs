use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::asset::{AssetError, DiskAssetStore};
use crate::store::{CatalogStore, InMemorySnapshot, JsonFileSnapshot, SnapshotCatalog};

pub const DEFAULT_ADDR: &str = "0.0.0.0:3001";
pub const DEFAULT_DATA_FILE: &str = "products.json";
pub const DEFAULT_SQLITE_PATH: &str = "products.db";
pub const DEFAULT_IMAGE_DIR: &str = "public/images";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which persistence strategy backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "http", derive(clap::ValueEnum))]
pub enum Backend {
    /// Volatile, nothing survives a restart.
    Memory,
    /// Whole-catalog JSON snapshot file.
    #[default]
    File,
    /// SQLite database, one statement per operation.
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Memory => "memory",
            Backend::File => "file",
            Backend::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "file" | "json" => Ok(Backend::File),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown backend: {0}")]
    UnknownBackend(String),
    #[error("backend {0} is not compiled in (enable the `{0}` feature)")]
    BackendNotCompiled(Backend),
    #[error(transparent)]
    Assets(#[from] AssetError),
}

/// Service configuration, loaded from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub addr: String,
    pub backend: Backend,
    pub data_file: PathBuf,
    pub sqlite_path: PathBuf,
    pub image_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            backend: Backend::default(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            sqlite_path: PathBuf::from(DEFAULT_SQLITE_PATH),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl CatalogConfig {
    /// Load from `CATALOG_*` environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Unset variables keep their
    /// defaults; unparseable ones are logged and keep their defaults too.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("CATALOG_ADDR") {
            config.addr = addr;
        }
        if let Some(raw) = lookup("CATALOG_BACKEND") {
            match raw.parse() {
                Ok(backend) => config.backend = backend,
                Err(e) => warn!(value = %raw, error = %e, "ignoring CATALOG_BACKEND"),
            }
        }
        if let Some(path) = lookup("CATALOG_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("CATALOG_SQLITE_PATH") {
            config.sqlite_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("CATALOG_IMAGE_DIR") {
            config.image_dir = PathBuf::from(path);
        }
        if let Some(raw) = lookup("CATALOG_MAX_UPLOAD_BYTES") {
            match raw.trim().parse() {
                Ok(bytes) => config.max_upload_bytes = bytes,
                Err(_) => warn!(value = %raw, "ignoring CATALOG_MAX_UPLOAD_BYTES"),
            }
        }

        config
    }

    /// Open the configured catalog store. Startup load failures are logged by
    /// the store itself and never fail this call.
    pub fn open_store(&self) -> Result<Box<dyn CatalogStore>, ConfigError> {
        match self.backend {
            Backend::Memory => Ok(Box::new(SnapshotCatalog::open(InMemorySnapshot::new()))),
            Backend::File => Ok(Box::new(SnapshotCatalog::open(JsonFileSnapshot::new(
                &self.data_file,
            )))),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite => Ok(Box::new(crate::store::SqliteCatalog::open(
                &self.sqlite_path,
            ))),
            #[cfg(not(feature = "sqlite"))]
            Backend::Sqlite => Err(ConfigError::BackendNotCompiled(Backend::Sqlite)),
        }
    }

    /// Open the image directory, creating it if needed.
    pub fn open_assets(&self) -> Result<DiskAssetStore, ConfigError> {
        Ok(DiskAssetStore::new(&self.image_dir)?)
    }
}
