pub mod asset;
pub mod config;
mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod logging;
mod product;
mod repository;
mod service;
pub mod store;
pub mod validation;

pub use asset::{AssetError, AssetStore, DiskAssetStore, InMemoryAssetStore, ASSET_MOUNT};
pub use config::{Backend, CatalogConfig, ConfigError};
pub use error::{CatalogError, StorageError};
pub use product::{Product, ProductDraft, ProductFields, ProductId, DEFAULT_CATEGORY};
pub use repository::ProductRepository;
pub use service::{CatalogService, Upload};
#[cfg(feature = "sqlite")]
pub use store::SqliteCatalog;
pub use store::{
    CatalogStore, InMemorySnapshot, JsonFileSnapshot, Snapshot, SnapshotCatalog, SnapshotStore,
};
pub use validation::ValidationError;
