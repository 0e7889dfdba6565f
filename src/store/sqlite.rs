//! SqliteCatalog - external-store strategy backed by SQLite.
//!
//! Each catalog operation maps onto one statement or one transaction, so
//! atomicity comes from the database rather than from a process-wide lock.
//! Ids come from `INTEGER PRIMARY KEY AUTOINCREMENT` and are never reused.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{info, warn};

use super::CatalogStore;
use crate::error::StorageError;
use crate::product::{Product, ProductFields, ProductId};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL,
    price    REAL NOT NULL,
    category TEXT NOT NULL,
    image    TEXT NOT NULL
);
"#;

const SELECT_COLUMNS: &str = "SELECT id, name, price, category, image FROM products";

/// Product catalog stored in a SQLite database file.
///
/// If the database cannot be opened at startup the failure is logged and the
/// store stays disconnected; every operation then retries the connection and
/// fails with [`StorageError::Unavailable`] until it succeeds.
pub struct SqliteCatalog {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl SqliteCatalog {
    /// Connect to the database at `path`, creating the schema if needed.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let conn = match connect(&path) {
            Ok(conn) => {
                info!(path = %path.display(), "connected to product database");
                Some(conn)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "product database unavailable, will retry per request");
                None
            }
        };
        Self {
            path,
            conn: Mutex::new(conn),
        }
    }

    /// Whether a connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.conn.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    fn with_conn<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StorageError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| StorageError::LockPoisoned(operation))?;

        if guard.is_none() {
            let conn = connect(&self.path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
            info!(path = %self.path.display(), "reconnected to product database");
            *guard = Some(conn);
        }
        let conn = guard
            .as_mut()
            .ok_or_else(|| StorageError::Unavailable("no connection".to_string()))?;

        f(conn).map_err(|e| StorageError::Database(e.to_string()))
    }
}

fn connect(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get::<_, i64>(0)? as ProductId,
        name: row.get(1)?,
        price: row.get(2)?,
        category: row.get(3)?,
        image: row.get(4)?,
    })
}

fn find(conn: &Connection, id: ProductId) -> rusqlite::Result<Option<Product>> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_COLUMNS),
        params![id as i64],
        product_from_row,
    )
    .optional()
}

impl CatalogStore for SqliteCatalog {
    fn list(&self) -> Result<Vec<Product>, StorageError> {
        self.with_conn("list", |conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
            let products = stmt
                .query_map([], product_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(products)
        })
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        self.with_conn("get", |conn| find(conn, id))
    }

    fn insert(&self, fields: ProductFields, image: String) -> Result<Product, StorageError> {
        self.with_conn("insert", |conn| {
            conn.execute(
                "INSERT INTO products (name, price, category, image) VALUES (?1, ?2, ?3, ?4)",
                params![fields.name, fields.price, fields.category, image],
            )?;
            let id = conn.last_insert_rowid() as ProductId;
            Ok(fields.into_product(id, image))
        })
    }

    fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
        image: Option<&str>,
    ) -> Result<Option<Product>, StorageError> {
        self.with_conn("update", |conn| {
            let tx = conn.transaction()?;
            let Some(mut product) = find(&tx, id)? else {
                return Ok(None);
            };
            fields.apply_to(&mut product, image);
            tx.execute(
                "UPDATE products SET name = ?1, price = ?2, category = ?3, image = ?4 WHERE id = ?5",
                params![
                    product.name,
                    product.price,
                    product.category,
                    product.image,
                    id as i64
                ],
            )?;
            tx.commit()?;
            Ok(Some(product))
        })
    }

    fn remove(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        self.with_conn("remove", |conn| {
            let tx = conn.transaction()?;
            let Some(product) = find(&tx, id)? else {
                return Ok(None);
            };
            tx.execute("DELETE FROM products WHERE id = ?1", params![id as i64])?;
            tx.commit()?;
            Ok(Some(product))
        })
    }
}
