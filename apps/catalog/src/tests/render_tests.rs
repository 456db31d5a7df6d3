use super::*;
use catalog_core::ProductForm;
use shared::domain::Rating;

fn product(id: i64, title: &str, price: f64) -> Product {
    Product {
        id: ProductId(id),
        title: title.to_string(),
        description: format!("{title} description"),
        price,
        image: format!("https://example.com/{id}.png"),
        category: Some("electronics".to_string()),
        rating: Some(Rating {
            rate: 4.3,
            count: 12,
        }),
        liked: false,
    }
}

fn snapshot(products: Vec<Product>) -> StoreSnapshot {
    StoreSnapshot {
        products,
        loading: false,
        error: None,
    }
}

#[test]
fn listing_shows_count_items_and_page_indicator() {
    let mut products: Vec<Product> = (1..=7)
        .map(|id| product(id, &format!("Item {id}"), id as f64))
        .collect();
    products[0].liked = true;

    let text = render_listing_view(&snapshot(products), &ListingControls::default());

    assert!(text.starts_with("Products (7 items)\n"), "{text}");
    assert!(text.contains("Categories: all | electronics"), "{text}");
    assert!(text.contains("* #1    Item 1  $1.00  [electronics]  4.3/5 (12)"), "{text}");
    assert!(text.contains("  #5    Item 5"), "{text}");
    assert!(!text.contains("Item 6"), "{text}");
    assert!(text.ends_with("Page 1 of 2\n"), "{text}");
}

#[test]
fn empty_filter_result_says_no_products_found() {
    let mut controls = ListingControls::default();
    controls.set_search("nothing matches this");

    let text = render_listing_view(&snapshot(vec![product(1, "Lamp", 3.0)]), &controls);

    assert!(text.starts_with("Products (0 items)\n"), "{text}");
    assert!(text.contains("matching 'nothing matches this'"), "{text}");
    assert!(text.ends_with("No products found\n"), "{text}");
}

#[test]
fn empty_store_has_plain_header() {
    let text = render_listing_view(&snapshot(Vec::new()), &ListingControls::default());
    assert!(text.starts_with("Products\n"), "{text}");
}

#[test]
fn page_past_the_end_is_rendered_without_items() {
    let mut controls = ListingControls::default();
    controls.set_page(4);

    let text = render_listing_view(&snapshot(vec![product(1, "Lamp", 3.0)]), &controls);

    assert!(text.contains("No products on page 4"), "{text}");
    assert!(text.ends_with("Page 4 of 1\n"), "{text}");
}

#[test]
fn fetch_error_replaces_listing() {
    let mut state = snapshot(vec![product(1, "Lamp", 3.0)]);
    state.error = Some("failed to fetch products: server responded with 500".to_string());

    let text = render_listing_view(&state, &ListingControls::default());

    assert_eq!(
        text,
        "Error: failed to fetch products: server responded with 500\n"
    );
}

#[test]
fn detail_view_lists_all_fields() {
    let mut item = product(3, "Kettle", 35.5);
    item.liked = true;

    let text = render_detail(&item);

    assert!(text.starts_with("#3 Kettle  [liked]\n"), "{text}");
    assert!(text.contains("Category: electronics\n"), "{text}");
    assert!(text.contains("Price: $35.50\n"), "{text}");
    assert!(text.contains("Rating: 4.3 (12 reviews)\n"), "{text}");
    assert!(text.ends_with("\nKettle description\n"), "{text}");
}

#[test]
fn not_found_and_validation_views() {
    assert_eq!(render_not_found(ProductId(9)), "Product not found (#9)\n");

    let errors = ProductForm::default().validate().expect_err("invalid");
    let text = render_validation(&errors);
    assert!(text.contains("  title: Title is required\n"), "{text}");
    assert!(text.contains("  image: Image URL is required\n"), "{text}");
}
