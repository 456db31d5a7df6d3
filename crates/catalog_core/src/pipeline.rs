//! Filter, sort and paginate the held product list into the visible page.

use std::{collections::HashSet, str::FromStr};

use shared::domain::Product;
use thiserror::Error;

pub const PAGE_SIZE: usize = 5;
pub const ALL_OPTION: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeFilter {
    #[default]
    All,
    Liked,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceSort {
    #[default]
    None,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {control} option '{value}'")]
pub struct ControlParseError {
    control: &'static str,
    value: String,
}

impl FromStr for LikeFilter {
    type Err = ControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "liked" | "favorites" => Ok(Self::Liked),
            _ => Err(ControlParseError {
                control: "like filter",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(ControlParseError {
                control: "category",
                value: s.to_string(),
            });
        }
        if value == ALL_OPTION {
            Ok(Self::All)
        } else {
            Ok(Self::Only(value.to_string()))
        }
    }
}

impl FromStr for PriceSort {
    type Err = ControlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "default" => Ok(Self::None),
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ControlParseError {
                control: "price sort",
                value: s.to_string(),
            }),
        }
    }
}

/// The five listing controls. Every filter-affecting setter moves back to
/// page 1; only `set_page` leaves the page alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingControls {
    like: LikeFilter,
    category: CategoryFilter,
    search: String,
    sort: PriceSort,
    page: usize,
}

impl Default for ListingControls {
    fn default() -> Self {
        Self {
            like: LikeFilter::All,
            category: CategoryFilter::All,
            search: String::new(),
            sort: PriceSort::None,
            page: 1,
        }
    }
}

impl ListingControls {
    pub fn like(&self) -> LikeFilter {
        self.like
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> PriceSort {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_like(&mut self, like: LikeFilter) {
        self.like = like;
        self.page = 1;
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: PriceSort) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub items: Vec<Product>,
    pub page: usize,
    pub total: usize,
    pub page_count: usize,
    pub categories: Vec<String>,
}

pub fn build_listing(products: &[Product], controls: &ListingControls) -> ListingPage {
    let liked = filter_by_like(products.iter(), controls.like);
    let in_category = filter_by_category(liked, &controls.category);
    let matching = filter_by_search(in_category, &controls.search);
    let mut ordered: Vec<&Product> = matching.collect();
    sort_by_price(&mut ordered, controls.sort);

    let total = ordered.len();
    ListingPage {
        items: paginate(&ordered, controls.page)
            .iter()
            .map(|product| (*product).clone())
            .collect(),
        page: controls.page,
        total,
        page_count: page_count(total),
        categories: category_options(products),
    }
}

pub fn filter_by_like<'a>(
    products: impl Iterator<Item = &'a Product>,
    like: LikeFilter,
) -> impl Iterator<Item = &'a Product> {
    products.filter(move |product| like == LikeFilter::All || product.liked)
}

pub fn filter_by_category<'a, 'c>(
    products: impl Iterator<Item = &'a Product> + 'c,
    category: &'c CategoryFilter,
) -> impl Iterator<Item = &'a Product> + 'c
where
    'a: 'c,
{
    products.filter(move |product| match category {
        CategoryFilter::All => true,
        CategoryFilter::Only(name) => product.has_category(name),
    })
}

pub fn filter_by_search<'a>(
    products: impl Iterator<Item = &'a Product>,
    term: &str,
) -> impl Iterator<Item = &'a Product> {
    let needle = term.to_lowercase();
    products.filter(move |product| {
        needle.is_empty()
            || product.title.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    })
}

/// Stable: equal prices keep their relative order.
pub fn sort_by_price(products: &mut [&Product], sort: PriceSort) {
    match sort {
        PriceSort::None => {}
        PriceSort::Ascending => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        PriceSort::Descending => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
}

/// 1-based. Pages outside `1..=page_count` come back empty.
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(PAGE_SIZE))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}

pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Distinct non-empty categories of the whole list in first-seen order,
/// led by the implicit "all" option.
pub fn category_options(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = vec![ALL_OPTION.to_string()];
    for category in products.iter().filter_map(|p| p.category.as_deref()) {
        if !category.is_empty() && seen.insert(category) {
            options.push(category.to_string());
        }
    }
    options
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
