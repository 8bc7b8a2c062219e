//! Product storage subsystem.
//!
//! # Data Flow
//! ```text
//! StoreConfig (backend, database_url)
//!     → open() selects implementation
//!     → memory.rs (ordered Vec behind an RwLock)
//!     → sqlite.rs (sqlx pool, products table)
//!     → shared as Arc<dyn ProductStore> via AppState
//! ```
//!
//! # Design Decisions
//! - One capability set, two interchangeable backends
//! - Every mutation runs under a single store-owned guard
//! - Lookups by name resolve to the first match in store order

pub mod memory;
pub mod sqlite;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StoreBackend, StoreConfig};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use types::{Product, StoreError, StoreResult};

/// Capability set shared by all product store backends.
#[async_trait]
pub trait ProductStore: Send + Sync + std::fmt::Debug {
    /// All products in store order.
    async fn list(&self) -> StoreResult<Vec<Product>>;

    /// First product whose name equals `name`.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Product>>;

    /// Append a product. No existence check is made.
    async fn create(&self, product: Product) -> StoreResult<()>;

    /// Replace the first product named `name` with `product`.
    ///
    /// Returns `false` when nothing matched; the store is left untouched.
    async fn replace_by_name(&self, name: &str, product: Product) -> StoreResult<bool>;

    /// Remove the first product named `name`.
    ///
    /// Returns `false` when nothing matched. Ordering of the remaining
    /// products is not guaranteed to be preserved.
    async fn delete_by_name(&self, name: &str) -> StoreResult<bool>;

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}

/// Open the store backend selected by configuration.
pub async fn open(config: &StoreConfig) -> StoreResult<Arc<dyn ProductStore>> {
    let store: Arc<dyn ProductStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteStore::connect(&config.database_url).await?),
    };

    tracing::info!(backend = store.backend(), "Product store opened");
    Ok(store)
}
