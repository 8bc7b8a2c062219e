//! In-memory product store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{Product, ProductStore, StoreResult};

/// Ordered in-memory collection of products.
///
/// Readers share the lock; every mutation holds the write lock for its whole
/// find-and-modify step, so a concurrent reader never sees a half-written
/// record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.name == name).cloned())
    }

    async fn create(&self, product: Product) -> StoreResult<()> {
        self.products.write().await.push(product);
        Ok(())
    }

    async fn replace_by_name(&self, name: &str, product: Product) -> StoreResult<bool> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.name == name) {
            Some(slot) => {
                *slot = product;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_name(&self, name: &str) -> StoreResult<bool> {
        let mut products = self.products.write().await;
        match products.iter().position(|p| p.name == name) {
            Some(index) => {
                // Last element moves into the hole.
                products.swap_remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
