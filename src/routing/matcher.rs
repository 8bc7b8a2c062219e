//! Keyword-based operation matching.
//!
//! # Responsibilities
//! - Resolve an operation from method + raw request target
//! - Report an explicit no-match carrying the method for the 400 message
//!
//! # Design Decisions
//! - The request target (path and query) is searched as a plain string
//! - Only operations bound to the request method are considered
//! - Keyword order decides overlaps (`get-product-list` wins over
//!   `get-product-info` when both appear)

use std::fmt;

use axum::http::{Method, Uri};

use crate::routing::Operation;

/// No operation matches the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMatch {
    pub method: Method,
}

impl fmt::Display for NoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Got unexpected {} request", self.method)
    }
}

impl std::error::Error for NoMatch {}

/// Resolve the operation named by a keyword inside the request target.
pub fn resolve(method: &Method, uri: &Uri) -> Result<Operation, NoMatch> {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    Operation::ALL
        .into_iter()
        .filter(|op| op.method() == *method)
        .find(|op| target.contains(op.keyword()))
        .ok_or_else(|| NoMatch {
            method: method.clone(),
        })
}
