//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route table)
//!     → request.rs (request ID, query parameter decoding)
//!     → handlers.rs (validate, call the product store)
//!     → response.rs (JSON body or error status)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{QueryParams, RequestIdGenerator, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
