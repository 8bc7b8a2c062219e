//! The closed set of operations the service performs.

use std::fmt;

use axum::http::Method;
use axum::routing::MethodFilter;

/// One recognized request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListProducts,
    GetProductInfo,
    CreateNewProduct,
    ChangeProductByName,
    DeleteProduct,
}

impl Operation {
    /// Every operation, in resolution order.
    pub const ALL: [Operation; 5] = [
        Operation::ListProducts,
        Operation::GetProductInfo,
        Operation::CreateNewProduct,
        Operation::ChangeProductByName,
        Operation::DeleteProduct,
    ];

    /// Keyword identifying the operation in a request target.
    pub fn keyword(self) -> &'static str {
        match self {
            Operation::ListProducts => "get-product-list",
            Operation::GetProductInfo => "get-product-info",
            Operation::CreateNewProduct => "create-new-product",
            Operation::ChangeProductByName => "change-product-by-name",
            Operation::DeleteProduct => "delete-product",
        }
    }

    /// Exact path registered in the route table.
    pub fn path(self) -> &'static str {
        match self {
            Operation::ListProducts => "/get-product-list",
            Operation::GetProductInfo => "/get-product-info",
            Operation::CreateNewProduct => "/create-new-product",
            Operation::ChangeProductByName => "/change-product-by-name",
            Operation::DeleteProduct => "/delete-product",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::ListProducts | Operation::GetProductInfo => Method::GET,
            Operation::CreateNewProduct | Operation::ChangeProductByName => Method::POST,
            Operation::DeleteProduct => Method::DELETE,
        }
    }

    pub(crate) fn method_filter(self) -> MethodFilter {
        match self {
            Operation::ListProducts | Operation::GetProductInfo => MethodFilter::GET,
            Operation::CreateNewProduct | Operation::ChangeProductByName => MethodFilter::POST,
            Operation::DeleteProduct => MethodFilter::DELETE,
        }
    }

    /// Query parameters the operation requires, in validation order.
    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            Operation::ListProducts => &[],
            Operation::GetProductInfo | Operation::DeleteProduct => &["name"],
            Operation::CreateNewProduct => &["name", "code", "category"],
            Operation::ChangeProductByName => &["old-name", "name", "code", "category"],
        }
    }

    /// Whether the operation mutates the product store.
    pub fn is_mutation(self) -> bool {
        !matches!(self, Operation::ListProducts | Operation::GetProductInfo)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
