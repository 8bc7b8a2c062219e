//! HTTP client for the shop API.
//!
//! Talks to the exact-path route table. Used by the `shop-cli` binary and
//! the integration tests.

use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use crate::routing::Operation;
use crate::store::Product;

/// Errors returned by [`ShopClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport or decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    /// HTTP status reported by the server, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

/// Thin async client over the shop endpoints.
#[derive(Debug, Clone)]
pub struct ShopClient {
    client: Client,
    base_url: String,
}

impl ShopClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, op: Operation) -> String {
        format!("{}{}", self.base_url, op.path())
    }

    /// All products.
    pub async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let res = self.client.get(self.url(Operation::ListProducts)).send().await?;
        Ok(check(res).await?.json().await?)
    }

    /// Product named `name`.
    pub async fn info(&self, name: &str) -> Result<Product, ClientError> {
        let res = self
            .client
            .get(self.url(Operation::GetProductInfo))
            .query(&[("name", name)])
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn create(&self, product: &Product) -> Result<(), ClientError> {
        let res = self
            .client
            .post(self.url(Operation::CreateNewProduct))
            .query(&[
                ("name", product.name.as_str()),
                ("code", product.code.as_str()),
                ("category", product.category.as_str()),
            ])
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    /// Replace the product named `old_name` with `product`.
    pub async fn change(&self, old_name: &str, product: &Product) -> Result<(), ClientError> {
        let res = self
            .client
            .post(self.url(Operation::ChangeProductByName))
            .query(&[
                ("old-name", old_name),
                ("name", product.name.as_str()),
                ("code", product.code.as_str()),
                ("category", product.category.as_str()),
            ])
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<(), ClientError> {
        let res = self
            .client
            .delete(self.url(Operation::DeleteProduct))
            .query(&[("name", name)])
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }
}

async fn check(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let message = res.text().await.unwrap_or_default();
    Err(ClientError::Status { status, message })
}
