use serde::{Deserialize, Serialize};

use crate::domain::{Product, ProductId, Rating};

/// Product record exactly as the remote catalog serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            price: record.price,
            image: record.image,
            category: record.category,
            rating: record.rating,
            liked: false,
        }
    }
}

/// Body of `POST /products`. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Partial product used both as the `PUT /products/{id}` body and as the
/// shape of the server's reply. Absent fields are left untouched on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
        if let Some(rating) = self.rating {
            product.rating = Some(rating);
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
