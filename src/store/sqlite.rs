//! SQLite-backed product store.
//!
//! # Responsibilities
//! - Open (or create) the database and the `products` table
//! - Map store operations onto single SQL statements
//! - Keep store order stable via the autoincrement `id`
//!
//! # Design Decisions
//! - Update and delete target the lowest `id` with the name, so "first
//!   match" means insertion order just like the in-memory backend
//! - Writes are serialized by an async mutex on top of SQLite's own locking
//! - In-memory URLs pin a single never-expiring connection; every new
//!   connection to `:memory:` would otherwise see an empty database

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use crate::store::{Product, ProductStore, StoreResult};

const FILE_POOL_SIZE: u32 = 5;

/// Product store persisted in a SQLite database.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Connect to `database_url` and make sure the schema exists.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool_options = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE)
        };

        let pool = pool_options.connect_with(options).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                name     TEXT NOT NULL,
                code     TEXT NOT NULL,
                category TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        tracing::debug!(database_url = %database_url, "SQLite schema ready");

        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn product_from_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        name: row.try_get("name")?,
        code: row.try_get("code")?,
        category: row.try_get("category")?,
    })
}

#[async_trait]
impl ProductStore for SqliteStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query("SELECT name, code, category FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            "SELECT name, code, category FROM products WHERE name = ?1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(product_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, product: Product) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        sqlx::query("INSERT INTO products (name, code, category) VALUES (?1, ?2, ?3)")
            .bind(&product.name)
            .bind(&product.code)
            .bind(&product.category)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_by_name(&self, name: &str, product: Product) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?1, code = ?2, category = ?3
            WHERE id = (SELECT id FROM products WHERE name = ?4 ORDER BY id LIMIT 1)
            "#,
        )
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.category)
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_name(&self, name: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query(
            "DELETE FROM products WHERE id = (SELECT id FROM products WHERE name = ?1 ORDER BY id LIMIT 1)",
        )
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
