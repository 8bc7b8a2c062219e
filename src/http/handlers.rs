//! Operation handlers.
//!
//! Each handler validates its parameters in declared order, then performs a
//! single store call. Validation failures return before the store is touched.

use std::time::Instant;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::http::request::QueryParams;
use crate::http::response::{self, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{self, NoMatch, Operation};
use crate::store::Product;

/// Route-table entry point for a known operation.
pub async fn dispatch(State(state): State<AppState>, op: Operation, uri: Uri) -> Response {
    let start = Instant::now();
    tracing::info!(operation = %op, mutation = op.is_mutation(), "Got {} request", op);

    let params = QueryParams::parse(uri.query());
    let response = match execute(&state, op, &params).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };

    metrics::record_request(op.keyword(), response.status().as_u16(), start);
    response
}

/// Fallback for everything outside the route table.
pub async fn legacy_dispatch(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let resolved = if state.legacy_dispatch {
        routing::resolve(&method, &uri)
    } else {
        Err(NoMatch { method })
    };

    match resolved {
        Ok(op) => dispatch(State(state), op, uri).await,
        Err(no_match) => {
            let start = Instant::now();
            tracing::debug!(uri = %uri, "No operation matched");
            let response = ApiError::BadRequest(no_match.to_string()).into_response();
            metrics::record_request("unmatched", response.status().as_u16(), start);
            response
        }
    }
}

async fn execute(state: &AppState, op: Operation, params: &QueryParams) -> Result<Response, ApiError> {
    for key in op.required_params() {
        params.require(key)?;
    }

    match op {
        Operation::ListProducts => list_products(state).await,
        Operation::GetProductInfo => get_product_info(state, params).await,
        Operation::CreateNewProduct => create_new_product(state, params).await,
        Operation::ChangeProductByName => change_product_by_name(state, params).await,
        Operation::DeleteProduct => delete_product(state, params).await,
    }
}

async fn list_products(state: &AppState) -> Result<Response, ApiError> {
    let products = state.store.list().await?;
    response::json(&products)
}

async fn get_product_info(state: &AppState, params: &QueryParams) -> Result<Response, ApiError> {
    let name = params.require("name")?;

    match state.store.find_by_name(name).await? {
        Some(product) => response::json(&product),
        None => Err(ApiError::not_found_product(name)),
    }
}

async fn create_new_product(state: &AppState, params: &QueryParams) -> Result<Response, ApiError> {
    let product = product_from_params(params)?;
    state.store.create(product).await?;
    Ok(response::empty())
}

async fn change_product_by_name(
    state: &AppState,
    params: &QueryParams,
) -> Result<Response, ApiError> {
    let old_name = params.require("old-name")?;
    let product = product_from_params(params)?;

    if state.store.replace_by_name(old_name, product).await? {
        Ok(response::empty())
    } else {
        Err(ApiError::not_found_product(old_name))
    }
}

async fn delete_product(state: &AppState, params: &QueryParams) -> Result<Response, ApiError> {
    let name = params.require("name")?;

    if state.store.delete_by_name(name).await? {
        Ok(response::empty())
    } else {
        Err(ApiError::not_found_product(name))
    }
}

fn product_from_params(params: &QueryParams) -> Result<Product, ApiError> {
    let name = params.require("name")?;
    let code = params.require("code")?;
    let category = params.require("category")?;
    Ok(Product::new(name, code, category))
}
