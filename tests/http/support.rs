use std::sync::Arc;

use catalog_store::{CatalogService, DiskAssetStore, JsonFileSnapshot, SnapshotCatalog};
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;

/// A running server plus the scratch directory backing it.
pub struct TestServer {
    pub base: String,
    pub client: reqwest::Client,
    pub dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Bind to port 0 and serve a file-backed catalog.
pub async fn start_server() -> TestServer {
    start_server_with_limit(1024 * 1024).await
}

pub async fn start_server_with_limit(max_upload_bytes: usize) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(CatalogService::new(
        SnapshotCatalog::open(JsonFileSnapshot::new(dir.path().join("products.json"))),
        DiskAssetStore::new(dir.path().join("images")).unwrap(),
    ));

    let app = catalog_store::http::router(service, max_upload_bytes);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        dir,
    }
}

/// Multipart form with the given text fields.
pub fn form(fields: &[(&str, &str)]) -> Form {
    fields.iter().fold(Form::new(), |form, (name, value)| {
        form.text(name.to_string(), value.to_string())
    })
}

/// Attach an image part.
pub fn with_image(form: Form, filename: &str, bytes: &[u8]) -> Form {
    let part = Part::bytes(bytes.to_vec())
        .file_name(filename.to_string())
        .mime_str("image/png")
        .unwrap();
    form.part("image", part)
}
