//! Interactive listing session driven by one-line commands.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use catalog_core::{
    build_listing, CategoryFilter, LikeFilter, ListingControls, PriceSort, ProductStore,
};
use shared::domain::ProductId;

use crate::render::{render_detail, render_listing_view, render_not_found};

pub const HELP: &str = "\
Commands:
  search <term>          filter by title or description (empty clears)
  category <name|all>    filter by category
  sort <none|asc|desc>   order by price
  filter <all|liked>     show everything or favorites only
  page <n> | next | prev move between pages
  like <id>              toggle favorite
  show <id>              product details
  delete <id>            delete a product
  refresh                reload from the catalog
  help | quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Category(CategoryFilter),
    Sort(PriceSort),
    Filter(LikeFilter),
    Page(usize),
    Next,
    Prev,
    Like(ProductId),
    Show(ProductId),
    Delete(ProductId),
    Refresh,
    Help,
    Quit,
}

/// Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => BrowseCommand::Search(rest.to_string()),
        "category" | "c" => BrowseCommand::Category(rest.parse()?),
        "sort" => BrowseCommand::Sort(rest.parse()?),
        "filter" | "f" => BrowseCommand::Filter(rest.parse()?),
        "page" | "p" => {
            let page: usize = rest
                .parse()
                .with_context(|| format!("invalid page number '{rest}'"))?;
            if page == 0 {
                bail!("page numbers start at 1");
            }
            BrowseCommand::Page(page)
        }
        "next" | "n" => BrowseCommand::Next,
        "prev" => BrowseCommand::Prev,
        "like" | "l" => BrowseCommand::Like(parse_product_id(rest)?),
        "show" => BrowseCommand::Show(parse_product_id(rest)?),
        "delete" | "rm" => BrowseCommand::Delete(parse_product_id(rest)?),
        "refresh" | "r" => BrowseCommand::Refresh,
        "help" | "h" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => return Err(anyhow!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    let id = raw
        .trim_start_matches('#')
        .parse::<i64>()
        .with_context(|| format!("invalid product id '{raw}'"))?;
    Ok(ProductId(id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Render(String),
    Quit,
}

pub struct BrowseSession {
    store: Arc<ProductStore>,
    controls: ListingControls,
}

impl BrowseSession {
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self {
            store,
            controls: ListingControls::default(),
        }
    }

    pub fn controls(&self) -> &ListingControls {
        &self.controls
    }

    pub async fn start(&self) -> String {
        let snapshot = self.store.ensure_loaded().await;
        render_listing_view(&snapshot, &self.controls)
    }

    pub async fn execute(&mut self, command: BrowseCommand) -> Step {
        match command {
            BrowseCommand::Search(term) => self.controls.set_search(term),
            BrowseCommand::Category(category) => self.controls.set_category(category),
            BrowseCommand::Sort(sort) => self.controls.set_sort(sort),
            BrowseCommand::Filter(like) => self.controls.set_like(like),
            BrowseCommand::Page(page) => self.controls.set_page(page),
            BrowseCommand::Next => {
                let page_count = self.page_count();
                if self.controls.page() < page_count {
                    self.controls.set_page(self.controls.page() + 1);
                }
            }
            BrowseCommand::Prev => {
                if self.controls.page() > 1 {
                    self.controls.set_page(self.controls.page() - 1);
                }
            }
            BrowseCommand::Like(product_id) => {
                if self.store.find(product_id).is_none() {
                    return Step::Render(render_not_found(product_id));
                }
                self.store.toggle_like(product_id);
            }
            BrowseCommand::Show(product_id) => {
                return Step::Render(match self.store.find(product_id) {
                    Some(product) => render_detail(&product),
                    None => render_not_found(product_id),
                });
            }
            BrowseCommand::Delete(product_id) => {
                self.store.delete(product_id).await;
            }
            BrowseCommand::Refresh => {
                self.store.fetch_all().await;
            }
            BrowseCommand::Help => return Step::Render(HELP.to_string()),
            BrowseCommand::Quit => return Step::Quit,
        }
        Step::Render(render_listing_view(&self.store.snapshot(), &self.controls))
    }

    fn page_count(&self) -> usize {
        build_listing(&self.store.snapshot().products, &self.controls).page_count
    }
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;
