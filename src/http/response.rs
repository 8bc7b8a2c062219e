//! Response construction and error mapping.
//!
//! # Responsibilities
//! - Serialize JSON bodies with the content type set
//! - Map handler errors to HTTP status codes
//! - Log every error at the point it becomes a response
//!
//! # Design Decisions
//! - Content-Type `application/json` only on responses with a JSON body
//! - Error messages are sent back as plain text
//! - 4xx logged at warn, 5xx at error

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Terminal failure for the current request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/empty parameter or unrecognized method and path.
    #[error("{0}")]
    BadRequest(String),

    /// No product matches the supplied key.
    #[error("{0}")]
    NotFound(String),

    /// Response serialization failed.
    #[error("{0}")]
    Internal(String),

    /// The product store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn not_found_product(name: &str) -> Self {
        ApiError::NotFound(format!("Not found product with name:{name}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("failed to serialize response: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, message).into_response()
    }
}

/// 200 response with a newline-terminated JSON body.
pub fn json<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let mut body = serde_json::to_vec(value)?;
    body.push(b'\n');

    let mut response = Response::new(Body::from(body));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(response)
}

/// 200 response without body or content type.
pub fn empty() -> Response {
    StatusCode::OK.into_response()
}
