//! Plain-text views for the listing, detail and form screens.

use std::fmt::Write as _;

use catalog_core::{
    build_listing, CategoryFilter, FormField, LikeFilter, ListingControls, ListingPage, PriceSort,
    StoreSnapshot, ValidationErrors,
};
use shared::domain::{Product, ProductId};

pub fn render_listing_view(snapshot: &StoreSnapshot, controls: &ListingControls) -> String {
    if let Some(error) = &snapshot.error {
        return render_error(error);
    }
    let listing = build_listing(&snapshot.products, controls);
    render_listing(&listing, controls, snapshot.products.len())
}

pub fn render_listing(listing: &ListingPage, controls: &ListingControls, held: usize) -> String {
    let mut out = String::new();
    if held > 0 {
        let _ = writeln!(out, "Products ({} items)", listing.total);
    } else {
        out.push_str("Products\n");
    }
    let _ = writeln!(out, "Categories: {}", listing.categories.join(" | "));
    let _ = writeln!(out, "Showing: {}", describe_controls(controls));

    if listing.total == 0 {
        out.push_str("No products found\n");
        return out;
    }

    if listing.items.is_empty() {
        let _ = writeln!(out, "No products on page {}", listing.page);
    }
    for product in &listing.items {
        let _ = writeln!(out, "{}", product_line(product));
    }
    let _ = writeln!(out, "Page {} of {}", listing.page, listing.page_count);
    out
}

fn describe_controls(controls: &ListingControls) -> String {
    let like = match controls.like() {
        LikeFilter::All => "all products",
        LikeFilter::Liked => "favorites",
    };
    let category = match controls.category() {
        CategoryFilter::All => "all categories".to_string(),
        CategoryFilter::Only(name) => format!("category '{name}'"),
    };
    let sort = match controls.sort() {
        PriceSort::None => "default sorting",
        PriceSort::Ascending => "price low to high",
        PriceSort::Descending => "price high to low",
    };
    let mut description = format!("{like}, {category}, {sort}");
    if !controls.search().is_empty() {
        let _ = write!(description, ", matching '{}'", controls.search());
    }
    description
}

fn product_line(product: &Product) -> String {
    let marker = if product.liked { '*' } else { ' ' };
    let mut line = format!(
        "{marker} #{:<4} {}  ${:.2}",
        product.id, product.title, product.price
    );
    if let Some(category) = &product.category {
        let _ = write!(line, "  [{category}]");
    }
    if let Some(rating) = &product.rating {
        let _ = write!(line, "  {:.1}/5 ({})", rating.rate, rating.count);
    }
    line
}

pub fn render_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = write!(out, "#{} {}", product.id, product.title);
    if product.liked {
        out.push_str("  [liked]");
    }
    out.push('\n');
    if let Some(category) = &product.category {
        let _ = writeln!(out, "Category: {category}");
    }
    let _ = writeln!(out, "Price: ${:.2}", product.price);
    if let Some(rating) = &product.rating {
        let _ = writeln!(out, "Rating: {:.1} ({} reviews)", rating.rate, rating.count);
    }
    let _ = writeln!(out, "Image: {}", product.image);
    let _ = writeln!(out, "\n{}", product.description);
    out
}

pub fn render_not_found(product_id: ProductId) -> String {
    format!("Product not found (#{product_id})\n")
}

pub fn render_error(message: &str) -> String {
    format!("Error: {message}\n")
}

pub fn render_validation(errors: &ValidationErrors) -> String {
    let mut out = String::from("The product form has errors:\n");
    for field in FormField::ALL {
        if let Some(message) = errors.message_for(field) {
            let _ = writeln!(out, "  {field}: {message}");
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
