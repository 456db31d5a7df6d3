pub mod error;
pub mod form;
pub mod pipeline;
pub mod service;
pub mod store;

pub use error::{CatalogOperation, CatalogServiceError, StoreError};
pub use form::{FormField, ProductForm, ValidationErrors};
pub use pipeline::{
    build_listing, CategoryFilter, LikeFilter, ListingControls, ListingPage, PriceSort, PAGE_SIZE,
};
pub use service::{CatalogService, HttpCatalogService, DEFAULT_API_BASE_URL};
pub use store::{ProductStore, StoreEvent, StoreSnapshot};
