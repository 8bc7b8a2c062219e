//! Product entity and store error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The sole catalog entity.
///
/// `name` is the lookup key for fetch, update and delete. It is not unique:
/// two products may share a name, and lookups resolve to the first match in
/// store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub code: String,
    pub category: String,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            category: category.into(),
        }
    }
}

/// Errors raised by a product store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The relational backend failed (connect, schema or query).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
