use super::*;
use shared::domain::ProductId;

fn product(id: i64, title: &str, price: f64, category: Option<&str>) -> Product {
    Product {
        id: ProductId(id),
        title: title.to_string(),
        description: format!("description of item {id}"),
        price,
        image: format!("https://example.com/{id}.png"),
        category: category.map(str::to_string),
        rating: None,
        liked: false,
    }
}

fn ids(products: &[Product]) -> Vec<i64> {
    products.iter().map(|p| p.id.0).collect()
}

fn ref_ids(products: &[&Product]) -> Vec<i64> {
    products.iter().map(|p| p.id.0).collect()
}

fn numbered(count: i64) -> Vec<Product> {
    (1..=count)
        .map(|id| product(id, &format!("Item {id}"), id as f64, None))
        .collect()
}

#[test]
fn like_filter_keeps_only_liked_records_in_order() {
    let mut products = numbered(6);
    products[1].liked = true;
    products[4].liked = true;
    products[5].liked = true;

    let liked: Vec<&Product> = filter_by_like(products.iter(), LikeFilter::Liked).collect();
    assert_eq!(ref_ids(&liked), vec![2, 5, 6]);

    let all: Vec<&Product> = filter_by_like(products.iter(), LikeFilter::All).collect();
    assert_eq!(ref_ids(&all), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn category_filter_is_exact_and_case_sensitive() {
    let products = vec![
        product(1, "a", 1.0, Some("jewelery")),
        product(2, "b", 1.0, Some("Jewelery")),
        product(3, "c", 1.0, None),
        product(4, "d", 1.0, Some("jewelery")),
    ];

    let only = CategoryFilter::Only("jewelery".to_string());
    let kept: Vec<&Product> = filter_by_category(products.iter(), &only).collect();
    assert_eq!(ref_ids(&kept), vec![1, 4]);

    let all = CategoryFilter::All;
    let kept: Vec<&Product> = filter_by_category(products.iter(), &all).collect();
    assert_eq!(ref_ids(&kept), vec![1, 2, 3, 4]);
}

#[test]
fn search_matches_title_or_description_ignoring_case() {
    let mut products = vec![
        product(1, "Silver Ring", 1.0, None),
        product(2, "Backpack", 1.0, None),
        product(3, "Monitor", 1.0, None),
    ];
    products[2].description = "A RING light is not included".to_string();

    let hits: Vec<&Product> = filter_by_search(products.iter(), "rInG").collect();
    assert_eq!(ref_ids(&hits), vec![1, 3]);

    let everything: Vec<&Product> = filter_by_search(products.iter(), "").collect();
    assert_eq!(ref_ids(&everything), vec![1, 2, 3]);
}

#[test]
fn price_sort_is_stable_for_ties() {
    let products = vec![
        product(1, "a", 5.0, None),
        product(2, "b", 1.0, None),
        product(3, "c", 5.0, None),
        product(4, "d", 1.0, None),
        product(5, "e", 3.0, None),
    ];

    let mut ascending: Vec<&Product> = products.iter().collect();
    sort_by_price(&mut ascending, PriceSort::Ascending);
    assert_eq!(ref_ids(&ascending), vec![2, 4, 5, 1, 3]);

    let mut descending: Vec<&Product> = products.iter().collect();
    sort_by_price(&mut descending, PriceSort::Descending);
    assert_eq!(ref_ids(&descending), vec![1, 3, 5, 2, 4]);

    let mut unsorted: Vec<&Product> = products.iter().collect();
    sort_by_price(&mut unsorted, PriceSort::None);
    assert_eq!(ref_ids(&unsorted), vec![1, 2, 3, 4, 5]);
}

#[test]
fn empty_result_has_no_pages() {
    let listing = build_listing(&[], &ListingControls::default());
    assert!(listing.items.is_empty());
    assert_eq!(listing.total, 0);
    assert_eq!(listing.page_count, 0);
    assert_eq!(listing.categories, vec!["all".to_string()]);
}

#[test]
fn twelve_records_span_three_pages() {
    let products = numbered(12);
    let mut controls = ListingControls::default();

    let first = build_listing(&products, &controls);
    assert_eq!(first.total, 12);
    assert_eq!(first.page_count, 3);
    assert_eq!(ids(&first.items), vec![1, 2, 3, 4, 5]);

    controls.set_page(3);
    let last = build_listing(&products, &controls);
    assert_eq!(ids(&last.items), vec![11, 12]);
}

#[test]
fn out_of_range_pages_are_empty() {
    let products = numbered(7);
    assert!(paginate(&products, 0).is_empty());
    assert!(paginate(&products, 3).is_empty());
    assert!(paginate(&products, usize::MAX).is_empty());
    assert_eq!(paginate(&products, 2).len(), 2);
}

#[test]
fn pagination_counts_over_filtered_and_sorted_subset() {
    let mut products = numbered(12);
    for product in products.iter_mut().filter(|p| p.id.0 % 2 == 0) {
        product.liked = true;
    }

    let mut controls = ListingControls::default();
    controls.set_like(LikeFilter::Liked);
    controls.set_sort(PriceSort::Descending);
    controls.set_page(2);

    let listing = build_listing(&products, &controls);
    assert_eq!(listing.total, 6);
    assert_eq!(listing.page_count, 2);
    assert_eq!(ids(&listing.items), vec![2]);
}

#[test]
fn category_options_come_from_full_list() {
    let mut products = vec![
        product(1, "a", 1.0, Some("electronics")),
        product(2, "b", 1.0, Some("")),
        product(3, "c", 1.0, Some("jewelery")),
        product(4, "d", 1.0, Some("electronics")),
        product(5, "e", 1.0, None),
    ];
    products[2].liked = true;

    let mut controls = ListingControls::default();
    controls.set_like(LikeFilter::Liked);
    let listing = build_listing(&products, &controls);

    assert_eq!(ids(&listing.items), vec![3]);
    assert_eq!(
        listing.categories,
        vec![
            "all".to_string(),
            "electronics".to_string(),
            "jewelery".to_string()
        ]
    );
}

#[test]
fn filter_changes_reset_page_but_page_changes_keep_filters() {
    let mut controls = ListingControls::default();
    controls.set_search("ring");
    controls.set_page(4);
    assert_eq!(controls.page(), 4);
    assert_eq!(controls.search(), "ring");

    controls.set_category(CategoryFilter::Only("jewelery".to_string()));
    assert_eq!(controls.page(), 1);

    controls.set_page(2);
    controls.set_sort(PriceSort::Ascending);
    assert_eq!(controls.page(), 1);

    controls.set_page(3);
    controls.set_like(LikeFilter::Liked);
    assert_eq!(controls.page(), 1);

    controls.set_page(2);
    controls.set_search("");
    assert_eq!(controls.page(), 1);
    assert_eq!(
        controls.category(),
        &CategoryFilter::Only("jewelery".to_string())
    );
    assert_eq!(controls.sort(), PriceSort::Ascending);
    assert_eq!(controls.like(), LikeFilter::Liked);
}

#[test]
fn parses_control_values() {
    assert_eq!("Liked".parse::<LikeFilter>(), Ok(LikeFilter::Liked));
    assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
    assert_eq!(
        "men's clothing".parse::<CategoryFilter>(),
        Ok(CategoryFilter::Only("men's clothing".to_string()))
    );
    assert_eq!("desc".parse::<PriceSort>(), Ok(PriceSort::Descending));
    assert!("sideways".parse::<PriceSort>().is_err());
    assert!("".parse::<CategoryFilter>().is_err());
}
