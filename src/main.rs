//! catalogd: serves the product catalog over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use catalog_store::{logging, Backend, CatalogConfig, CatalogService};
use clap::Parser;
use tracing::info;

/// Product catalog server. Flags override `CATALOG_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "catalogd", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long)]
    addr: Option<String>,

    /// Persistence strategy.
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// JSON snapshot path for the `file` backend.
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Database path for the `sqlite` backend.
    #[arg(long)]
    sqlite_path: Option<PathBuf>,

    /// Directory uploaded images are written to.
    #[arg(long)]
    image_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut CatalogConfig) {
        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(path) = self.data_file {
            config.data_file = path;
        }
        if let Some(path) = self.sqlite_path {
            config.sqlite_path = path;
        }
        if let Some(dir) = self.image_dir {
            config.image_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing()?;

    let mut config = CatalogConfig::from_env();
    Cli::parse().apply(&mut config);
    info!(
        backend = %config.backend,
        image_dir = %config.image_dir.display(),
        "starting catalog"
    );

    let store = config.open_store()?;
    let assets = config.open_assets()?;
    let service = Arc::new(CatalogService::new(store, assets));

    catalog_store::http::serve(service, &config.addr, config.max_upload_bytes).await?;
    Ok(())
}
