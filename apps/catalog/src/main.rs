use std::{io::Write as _, process::ExitCode, sync::Arc};

use anyhow::{bail, Result};
use catalog_core::{
    build_listing, CategoryFilter, HttpCatalogService, LikeFilter, ListingControls, PriceSort,
    ProductForm, ProductStore, StoreError, StoreEvent,
};
use clap::{Args, Parser, Subcommand};
use shared::{domain::ProductId, protocol::ProductPatch};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod browse;
mod config;
mod render;

use browse::{parse_command, BrowseSession, Step};
use config::{load_settings, normalize_api_base_url};
use render::{render_detail, render_listing, render_not_found, render_validation};

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse and edit the remote product catalog")]
struct Cli {
    /// Base URL of the catalog API; overrides catalog.toml and the environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List(ListArgs),
    Show { id: i64 },
    Create(CreateArgs),
    Edit(EditArgs),
    Delete { id: i64 },
    Browse,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    liked: bool,
    #[arg(long, default_value = "all")]
    category: CategoryFilter,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "none")]
    sort: PriceSort,
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    image: String,
    #[arg(long)]
    category: Option<String>,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: i64,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long)]
    image: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = load_settings();
    init_tracing(&settings.log_filter);

    let api_url =
        normalize_api_base_url(cli.api_url.as_deref().unwrap_or(&settings.api_base_url))?;
    let service = HttpCatalogService::new(api_url);
    info!(api_url = %service.base_url(), "catalog: using remote catalog");
    let store = ProductStore::new(Arc::new(service));

    match cli.command {
        Command::List(args) => list(&store, args).await?,
        Command::Show { id } => show(&store, ProductId(id)).await?,
        Command::Create(args) => return create(&store, args).await,
        Command::Edit(args) => return edit(&store, args).await,
        Command::Delete { id } => delete(&store, ProductId(id)).await?,
        Command::Browse => browse(store).await?,
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load(store: &ProductStore) -> Result<()> {
    let snapshot = store.fetch_all().await;
    if let Some(error) = snapshot.error {
        bail!(error);
    }
    Ok(())
}

async fn list(store: &ProductStore, args: ListArgs) -> Result<()> {
    load(store).await?;

    let mut controls = ListingControls::default();
    if args.liked {
        controls.set_like(LikeFilter::Liked);
    }
    controls.set_category(args.category);
    controls.set_search(args.search);
    controls.set_sort(args.sort);
    controls.set_page(args.page);

    let snapshot = store.snapshot();
    let listing = build_listing(&snapshot.products, &controls);
    print!(
        "{}",
        render_listing(&listing, &controls, snapshot.products.len())
    );
    Ok(())
}

async fn show(store: &ProductStore, product_id: ProductId) -> Result<()> {
    load(store).await?;
    match store.require(product_id) {
        Ok(product) => print!("{}", render_detail(&product)),
        Err(StoreError::NotFound(_)) => print!("{}", render_not_found(product_id)),
    }
    Ok(())
}

/// The validation view for an invalid form; `None` when it can be submitted.
fn validation_failure(form: &ProductForm) -> Option<String> {
    form.validate().err().map(|errors| render_validation(&errors))
}

async fn create(store: &ProductStore, args: CreateArgs) -> Result<ExitCode> {
    let form = ProductForm {
        title: args.title,
        description: args.description,
        price: args.price,
        image: args.image,
        category: args.category,
    };
    if let Some(view) = validation_failure(&form) {
        eprint!("{view}");
        return Ok(ExitCode::FAILURE);
    }

    let mut events = store.subscribe_events();
    let snapshot = store.create(form.into_new_product()?).await;
    let created = drain_events(&mut events)
        .into_iter()
        .find_map(|event| match event {
            StoreEvent::ProductCreated(product_id) => Some(product_id),
            _ => None,
        });
    match created.and_then(|product_id| snapshot.find(product_id)) {
        Some(product) => {
            println!("Created product #{}", product.id);
            print!("{}", render_detail(product));
        }
        None => println!("The product was not created; see the log for details."),
    }
    Ok(ExitCode::SUCCESS)
}

/// Fields given on the command line, as a patch over the held record.
fn edit_overrides(args: &EditArgs) -> Result<ProductPatch> {
    let overrides = ProductPatch {
        title: args.title.clone(),
        description: args.description.clone(),
        price: args.price,
        image: args.image.clone(),
        ..ProductPatch::default()
    };
    if overrides.is_empty() {
        bail!("nothing to change; pass at least one of --title, --description, --price, --image");
    }
    Ok(overrides)
}

async fn edit(store: &ProductStore, args: EditArgs) -> Result<ExitCode> {
    let overrides = edit_overrides(&args)?;
    load(store).await?;
    let product_id = ProductId(args.id);
    let mut product = match store.require(product_id) {
        Ok(product) => product,
        Err(StoreError::NotFound(_)) => {
            print!("{}", render_not_found(product_id));
            return Ok(ExitCode::SUCCESS);
        }
    };

    overrides.apply_to(&mut product);
    let form = ProductForm::from_product(&product);
    if let Some(view) = validation_failure(&form) {
        eprint!("{view}");
        return Ok(ExitCode::FAILURE);
    }

    let mut events = store.subscribe_events();
    let snapshot = store.update(product_id, form.into_patch()?).await;
    let updated = drain_events(&mut events)
        .iter()
        .any(|event| matches!(event, StoreEvent::ProductUpdated(id) if *id == product_id));
    match snapshot.find(product_id) {
        Some(product) if updated => {
            println!("Updated product #{product_id}");
            print!("{}", render_detail(product));
        }
        _ => println!("Product #{product_id} was not updated; see the log for details."),
    }
    Ok(ExitCode::SUCCESS)
}

async fn delete(store: &ProductStore, product_id: ProductId) -> Result<()> {
    let mut events = store.subscribe_events();
    store.delete(product_id).await;
    let deleted = drain_events(&mut events)
        .iter()
        .any(|event| matches!(event, StoreEvent::ProductDeleted(id) if *id == product_id));
    if deleted {
        println!("Deleted product #{product_id}");
    } else {
        println!("Product #{product_id} was not deleted; see the log for details.");
    }
    Ok(())
}

async fn browse(store: Arc<ProductStore>) -> Result<()> {
    let mut session = BrowseSession::new(store);
    print!("{}", session.start().await);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("[page {}] > ", session.controls().page());
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match session.execute(command).await {
            Step::Render(text) => print!("{text}"),
            Step::Quit => break,
        }
    }
    Ok(())
}

fn drain_events(events: &mut broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
