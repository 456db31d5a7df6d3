use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::{
    domain::{Product, ProductId},
    protocol::{NewProduct, ProductPatch},
};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::{
    error::{CatalogOperation, CatalogServiceError, StoreError},
    service::CatalogService,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub products: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreSnapshot {
    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }
}

#[derive(Debug, Clone)]
pub enum StoreEvent {
    ProductsLoaded {
        count: usize,
    },
    FetchFailed(String),
    LikeToggled {
        product_id: ProductId,
        liked: bool,
    },
    ProductCreated(ProductId),
    ProductUpdated(ProductId),
    ProductDeleted(ProductId),
    MutationFailed {
        operation: CatalogOperation,
        product_id: Option<ProductId>,
        message: String,
    },
}

/// Owner of the held product list. Every change goes through one of the
/// operations below; readers only ever see cloned snapshots.
pub struct ProductStore {
    catalog: Arc<dyn CatalogService>,
    state: RwLock<StoreSnapshot>,
    events: broadcast::Sender<StoreEvent>,
}

impl ProductStore {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            catalog,
            state: RwLock::new(StoreSnapshot::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.read_state().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().products.is_empty()
    }

    pub fn find(&self, product_id: ProductId) -> Option<Product> {
        self.read_state().find(product_id).cloned()
    }

    pub fn require(&self, product_id: ProductId) -> Result<Product, StoreError> {
        self.find(product_id).ok_or(StoreError::NotFound(product_id))
    }

    /// Fetches only when nothing is held yet.
    pub async fn ensure_loaded(&self) -> StoreSnapshot {
        if self.is_empty() {
            self.fetch_all().await
        } else {
            self.snapshot()
        }
    }

    /// Concurrent calls are not de-duplicated; the last one to complete wins.
    pub async fn fetch_all(&self) -> StoreSnapshot {
        {
            let mut state = self.write_state();
            state.loading = true;
            state.error = None;
        }

        match self.catalog.list_products().await {
            Ok(records) => {
                let mut products: Vec<Product> = Vec::with_capacity(records.len());
                for record in records {
                    if products.iter().any(|held| held.id == record.id) {
                        warn!(
                            product_id = %record.id,
                            "catalog: dropping duplicate product id from listing"
                        );
                        continue;
                    }
                    products.push(Product::from(record));
                }
                let count = products.len();
                let snapshot = {
                    let mut state = self.write_state();
                    state.products = products;
                    state.loading = false;
                    state.clone()
                };
                info!(count, "catalog: products loaded");
                let _ = self.events.send(StoreEvent::ProductsLoaded { count });
                snapshot
            }
            Err(err) => {
                let message = err.to_string();
                error!(error = %message, "catalog: fetch failed");
                let snapshot = {
                    let mut state = self.write_state();
                    state.error = Some(message.clone());
                    state.loading = false;
                    state.clone()
                };
                let _ = self.events.send(StoreEvent::FetchFailed(message));
                snapshot
            }
        }
    }

    /// Local only; an unknown id is a no-op.
    pub fn toggle_like(&self, product_id: ProductId) -> StoreSnapshot {
        let (snapshot, liked) = {
            let mut state = self.write_state();
            let liked = state
                .products
                .iter_mut()
                .find(|product| product.id == product_id)
                .map(|product| {
                    product.liked = !product.liked;
                    product.liked
                });
            (state.clone(), liked)
        };
        if let Some(liked) = liked {
            let _ = self
                .events
                .send(StoreEvent::LikeToggled { product_id, liked });
        }
        snapshot
    }

    /// Removes the record only after the remote delete succeeded.
    pub async fn delete(&self, product_id: ProductId) -> StoreSnapshot {
        if let Err(err) = self.catalog.delete_product(product_id).await {
            return self.report_mutation_failure(Some(product_id), err);
        }

        let snapshot = {
            let mut state = self.write_state();
            state.products.retain(|product| product.id != product_id);
            state.clone()
        };
        info!(%product_id, "catalog: product deleted");
        let _ = self.events.send(StoreEvent::ProductDeleted(product_id));
        snapshot
    }

    /// Appends the server's record. A reply reusing a held id leaves the held
    /// list unchanged and is reported as a failed mutation.
    pub async fn create(&self, product: NewProduct) -> StoreSnapshot {
        let record = match self.catalog.create_product(&product).await {
            Ok(record) => record,
            Err(err) => return self.report_mutation_failure(None, err),
        };

        let product_id = record.id;
        let (snapshot, appended) = {
            let mut state = self.write_state();
            let appended = state.find(product_id).is_none();
            if appended {
                state.products.push(Product::from(record));
            }
            (state.clone(), appended)
        };
        if !appended {
            let message =
                format!("server returned product id {product_id}, which is already held");
            warn!(%product_id, "catalog: created product not added; id already held");
            let _ = self.events.send(StoreEvent::MutationFailed {
                operation: CatalogOperation::CreateProduct,
                product_id: Some(product_id),
                message,
            });
            return snapshot;
        }
        info!(%product_id, "catalog: product created");
        let _ = self.events.send(StoreEvent::ProductCreated(product_id));
        snapshot
    }

    /// Merges whatever the server echoes back; fields it omits keep their
    /// prior values.
    pub async fn update(&self, product_id: ProductId, patch: ProductPatch) -> StoreSnapshot {
        let returned = match self.catalog.update_product(product_id, &patch).await {
            Ok(returned) => returned,
            Err(err) => return self.report_mutation_failure(Some(product_id), err),
        };

        let (snapshot, merged) = {
            let mut state = self.write_state();
            let held = state
                .products
                .iter_mut()
                .find(|product| product.id == product_id);
            let merged = held.is_some();
            if let Some(product) = held {
                returned.apply_to(product);
            }
            (state.clone(), merged)
        };
        if merged {
            info!(%product_id, "catalog: product updated");
            let _ = self.events.send(StoreEvent::ProductUpdated(product_id));
        } else {
            warn!(%product_id, "catalog: updated product is no longer held");
        }
        snapshot
    }

    fn report_mutation_failure(
        &self,
        product_id: Option<ProductId>,
        err: CatalogServiceError,
    ) -> StoreSnapshot {
        let operation = err.operation();
        let message = err.to_string();
        warn!(%operation, ?product_id, error = %message, "catalog: mutation failed");
        let _ = self.events.send(StoreEvent::MutationFailed {
            operation,
            product_id,
            message,
        });
        self.snapshot()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
