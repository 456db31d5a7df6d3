use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(ProductId);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

/// A catalog entry as held by the client. `liked` is local-only state.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: Option<String>,
    pub rating: Option<Rating>,
    pub liked: bool,
}

impl Product {
    pub fn has_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}
