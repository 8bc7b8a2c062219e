//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, query)
//!     → exact route table (one path per operation, see operation.rs)
//!     → otherwise matcher.rs (operation keyword in the request target)
//!     → Return: Operation or explicit NoMatch (400)
//! ```
//!
//! # Design Decisions
//! - Route table is fixed at compile time
//! - Keyword matching keeps old-style URIs such as
//!   `GET /?name=X&get-product-info` working
//! - Deterministic: keywords are tried in table order, first match wins

pub mod matcher;
pub mod operation;

pub use matcher::{resolve, NoMatch};
pub use operation::Operation;
