use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::ProductId,
    protocol::{NewProduct, ProductPatch, ProductRecord},
};
use tracing::debug;

use crate::error::{CatalogOperation, CatalogServiceError};

pub const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com";

/// Remote source of truth for product records.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogServiceError>;
    async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError>;
    async fn update_product(
        &self,
        product_id: ProductId,
        patch: &ProductPatch,
    ) -> Result<ProductPatch, CatalogServiceError>;
    async fn delete_product(&self, product_id: ProductId) -> Result<(), CatalogServiceError>;
}

pub struct HttpCatalogService {
    http: Client,
    base_url: String,
}

impl HttpCatalogService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn product_url(&self, product_id: ProductId) -> String {
        format!("{}/products/{product_id}", self.base_url)
    }
}

fn checked(
    operation: CatalogOperation,
    sent: Result<Response, reqwest::Error>,
) -> Result<Response, CatalogServiceError> {
    sent.and_then(Response::error_for_status)
        .map_err(|err| CatalogServiceError::from_reqwest(operation, err))
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        let operation = CatalogOperation::FetchProducts;
        let url = self.products_url();
        debug!(%url, "catalog: GET");
        checked(operation, self.http.get(url).send().await)?
            .json()
            .await
            .map_err(|err| CatalogServiceError::from_reqwest(operation, err))
    }

    async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let operation = CatalogOperation::CreateProduct;
        let url = self.products_url();
        debug!(%url, "catalog: POST");
        checked(operation, self.http.post(url).json(product).send().await)?
            .json()
            .await
            .map_err(|err| CatalogServiceError::from_reqwest(operation, err))
    }

    async fn update_product(
        &self,
        product_id: ProductId,
        patch: &ProductPatch,
    ) -> Result<ProductPatch, CatalogServiceError> {
        let operation = CatalogOperation::UpdateProduct;
        let url = self.product_url(product_id);
        debug!(%url, "catalog: PUT");
        checked(operation, self.http.put(url).json(patch).send().await)?
            .json()
            .await
            .map_err(|err| CatalogServiceError::from_reqwest(operation, err))
    }

    async fn delete_product(&self, product_id: ProductId) -> Result<(), CatalogServiceError> {
        let url = self.product_url(product_id);
        debug!(%url, "catalog: DELETE");
        checked(
            CatalogOperation::DeleteProduct,
            self.http.delete(url).send().await,
        )?;
        Ok(())
    }
}
