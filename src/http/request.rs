//! Request handling and parameter extraction.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) unless the client sent one
//! - Parse query strings into ordered key/value pairs
//! - Enforce presence of required parameters
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The first occurrence of a key wins; later duplicates are ignored
//! - Present-but-empty counts as missing

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

use crate::http::response::ApiError;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 request ID for every request lacking one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Read the correlation ID stamped on a request, if any.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Decoded query string, in the order the pairs appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode a raw query string (`a=1&b=2`). `None` yields no parameters.
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    /// Value of the first occurrence of `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of the first occurrence of `key`, which must be non-empty.
    pub fn require(&self, key: &str) -> Result<&str, ApiError> {
        match self.first(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ApiError::BadRequest(format!("{key} param not found"))),
        }
    }
}
