use std::fmt;

use shared::{
    domain::Product,
    protocol::{NewProduct, ProductPatch},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Price,
    Image,
}

impl FormField {
    pub const ALL: [FormField; 4] = [Self::Title, Self::Description, Self::Price, Self::Image];
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Price => "price",
            Self::Image => "image",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid product form: {}", summarize(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn message_for(&self, field: FormField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Create/edit form contents. Category is carried through untouched and is
/// not validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: Option<String>,
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError {
                field: FormField::Title,
                message: "Title is required",
            });
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError {
                field: FormField::Description,
                message: "Description is required",
            });
        }
        // NaN fails this comparison too.
        if !(self.price > 0.0) {
            errors.push(FieldError {
                field: FormField::Price,
                message: "Price must be greater than 0",
            });
        }
        if self.image.trim().is_empty() {
            errors.push(FieldError {
                field: FormField::Image,
                message: "Image URL is required",
            });
        } else if !looks_like_web_url(&self.image) {
            errors.push(FieldError {
                field: FormField::Image,
                message: "Please enter a valid URL",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }

    pub fn into_new_product(self) -> Result<NewProduct, ValidationErrors> {
        self.validate()?;
        Ok(NewProduct {
            title: self.title,
            description: self.description,
            price: self.price,
            image: self.image,
            category: self.category,
            rating: None,
        })
    }

    pub fn into_patch(self) -> Result<ProductPatch, ValidationErrors> {
        self.validate()?;
        Ok(ProductPatch {
            title: Some(self.title),
            description: Some(self.description),
            price: Some(self.price),
            image: Some(self.image),
            category: self.category,
            rating: None,
        })
    }
}

/// `http://` or `https://`, then something, a dot, and something.
fn looks_like_web_url(value: &str) -> bool {
    let Some(rest) = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    else {
        return false;
    };
    rest.char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < rest.len())
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
