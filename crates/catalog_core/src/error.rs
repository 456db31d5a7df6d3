use std::fmt;

use reqwest::StatusCode;
use shared::domain::ProductId;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOperation {
    FetchProducts,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

impl fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FetchProducts => "fetch products",
            Self::CreateProduct => "create product",
            Self::UpdateProduct => "update product",
            Self::DeleteProduct => "delete product",
        })
    }
}

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("failed to {operation}: {source}")]
    Request {
        operation: CatalogOperation,
        source: reqwest::Error,
    },
    #[error("failed to {operation}: server responded with {status}")]
    Status {
        operation: CatalogOperation,
        status: StatusCode,
    },
}

impl CatalogServiceError {
    pub(crate) fn from_reqwest(operation: CatalogOperation, source: reqwest::Error) -> Self {
        match source.status() {
            Some(status) => Self::Status { operation, status },
            None => Self::Request { operation, source },
        }
    }

    pub fn operation(&self) -> CatalogOperation {
        match self {
            Self::Request { operation, .. } | Self::Status { operation, .. } => *operation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("product {0} not found")]
    NotFound(ProductId),
}
