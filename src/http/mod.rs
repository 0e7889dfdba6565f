//! HTTP transport for the catalog.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /api/products`: `{ "products": [...] }`.
//! - `GET /api/products/:id`: one product, 404 if absent.
//! - `POST /api/products`: multipart `name`, `price`, `category?`, `image` file. 201 + product.
//! - `PUT /api/products/:id`: same fields, image optional. 200 + product.
//! - `DELETE /api/products/:id`: 200 + removed product.
//! - `GET /images/:filename`: stored image bytes.
//! - `GET /health`: `{ "ok": true }`.
//!
//! Errors are returned as `{ "error": message }` with the status from
//! [`CatalogError::status_code`].
//!
//! ## Example
//!
//! ```ignore
//! let service = Arc::new(CatalogService::new(store, assets));
//! catalog_store::http::serve(service, "0.0.0.0:3001", 10 * 1024 * 1024).await?;
//! ```

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};

use crate::asset::{AssetError, AssetStore};
use crate::error::CatalogError;
use crate::product::{ProductDraft, ProductId};
use crate::service::{CatalogService, Upload};
use crate::store::CatalogStore;

type Shared<S, A> = Arc<CatalogService<S, A>>;

/// Build an axum `Router` serving the catalog API and stored images.
pub fn router<S, A>(service: Shared<S, A>, max_upload_bytes: usize) -> Router
where
    S: CatalogStore + 'static,
    A: AssetStore + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/products",
            get(list_handler::<S, A>).post(create_handler::<S, A>),
        )
        .route(
            "/api/products/:id",
            get(show_handler::<S, A>)
                .put(update_handler::<S, A>)
                .delete(delete_handler::<S, A>),
        )
        .route("/images/:filename", get(image_handler::<S, A>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

/// Serve the catalog over HTTP at the given address until Ctrl-C.
pub async fn serve<S, A>(
    service: Shared<S, A>,
    addr: &str,
    max_upload_bytes: usize,
) -> Result<(), std::io::Error>
where
    S: CatalogStore + 'static,
    A: AssetStore + 'static,
{
    let app = router(service, max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "catalog listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

/// An error response: status plus a client-safe message.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Product not found")
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal storage error")
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.public_message())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Run blocking catalog work off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!(error = %e, "catalog task failed");
            Err(ApiError::internal())
        }
    }
}

/// Ids that are not numbers cannot name a product.
fn parse_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::not_found())
}

/// Collect the text fields and the optional `image` file part.
///
/// A file part with an empty filename is what browsers send when no file was
/// chosen; it counts as no image.
async fn read_form(mut multipart: Multipart) -> Result<(ProductDraft, Option<Upload>), ApiError> {
    let mut draft = ProductDraft::new();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);

        match (name.as_str(), filename) {
            ("image", Some(filename)) => {
                let bytes = field.bytes().await?;
                if !filename.is_empty() {
                    image = Some(Upload::new(filename, bytes.to_vec()));
                }
            }
            (_, Some(_)) => {
                return Err(ApiError::new(
                    StatusCode::BAD_REQUEST,
                    format!("Unexpected file field: {}", name),
                ));
            }
            (_, None) => {
                let value = field.text().await?;
                draft.set_field(&name, value);
            }
        }
    }

    Ok((draft, image))
}

/// `GET /health`
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// `GET /api/products`
async fn list_handler<S, A>(State(service): State<Shared<S, A>>) -> Result<Response, ApiError>
where
    S: CatalogStore + 'static,
    A: AssetStore + 'static,
{
    let products = blocking(move || service.list()).await?;
    Ok(Json(json!({ "products": products })).into_response())
}

/// `GET /api/products/:id`
async fn show_handler<S, A>(
    State(service): State<Shared<S, A>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    S: CatalogStore + 'static,
    A: AssetStore + 'static,
{
    let id = parse_id(&id)?;
    let product = blocking(move || service.get(id)).await?;
    Ok(Json(product).into_response())
}

/// `POST /api/products`
async fn create_handler<S, A>(
    State(service): State<Shared<S, A>>,
    multipart: Multipart,
) -> Result<Response, ApiError>
where
    S: CatalogStore + 'static,
    A: AssetStore + 'static,
{
    let (draft, image) = read_form(multipart).await?;
    let product = blocking(move || service.create(&draft, image)).await?;
    Ok((StatusCode::CREATED, Json(product)).into_response())
}

/// `PUT /api/products/:id`
async fn update_handler<S, A>(
    State(service): State<Shared<S, A>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, ApiError>
where
    S: CatalogStore + 'static,
    A: AssetStore + 'static,
{
    let id = parse_id(&id)?;
    let (draft, image) = read_form(multipart).await?;
    let product = blocking(move || service.update(id, &draft, image)).await?;
    Ok(Json(product).into_response())
}

/// `DELETE /api/products/:id`
async fn delete_handler<S, A>(
    State(service): State<Shared<S, A>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    S: CatalogStore + 'static,
    A: AssetStore + 'static,
{
    let id = parse_id(&id)?;
    let product = blocking(move || service.delete(id)).await?;
    Ok(Json(product).into_response())
}

/// `GET /images/:filename`
async fn image_handler<S, A>(
    State(service): State<Shared<S, A>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError>
where
    S: CatalogStore + 'static,
    A: AssetStore + 'static,
{
    let lookup = filename.clone();
    let found = blocking(move || match service.asset(&lookup) {
        Err(CatalogError::Asset(AssetError::InvalidFilename(_))) => Ok(None),
        other => other,
    })
    .await?;

    match found {
        Some(bytes) => Ok((
            [(header::CONTENT_TYPE, content_type_for(&filename))],
            bytes,
        )
            .into_response()),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "Not found")),
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
