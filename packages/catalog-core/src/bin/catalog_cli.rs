//! Catalog CLI
//!
//! Loads a JSON data file into an in-memory repository and runs one query or
//! mutation against it.
//!
//! # Usage
//!
//! ```bash
//! # Print the category tree
//! cargo run --bin catalog-cli -- --data catalog.json tree
//!
//! # Recursive totals for one category, as JSON
//! cargo run --bin catalog-cli -- --data catalog.json --format json aggregate --id 1
//!
//! # Second page of products, three per page
//! cargo run --bin catalog-cli -- --data catalog.json page --page 2 --per-page 3
//!
//! # Delete with an explicit policy
//! cargo run --bin catalog-cli -- --data catalog.json delete-category --id 1 --policy reject
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use catalog_core::features::tree::forest_iter;
use catalog_core::{
    CatalogConfig, CatalogService, Category, CategoryAggregate, CategoryNode, DeletePolicy,
    InMemoryCatalogRepository, Product,
};

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Catalog engine - category tree, aggregates and product pages", long_about = None)]
struct Cli {
    /// JSON data file: { "categories": [...], "products": [...] }
    #[arg(short, long)]
    data: PathBuf,

    /// YAML configuration file (schema v1)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the category tree
    Tree,

    /// Recursive product count and price sum for a category
    Aggregate {
        /// Category ID
        #[arg(short, long)]
        id: String,
    },

    /// One page of products
    Page {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Items per page (defaults to the configured page size)
        #[arg(long)]
        per_page: Option<usize>,
    },

    /// Delete a category and report what happened to its subtree
    DeleteCategory {
        /// Category ID
        #[arg(short, long)]
        id: String,

        /// cascade | reparent | reject (defaults to the configured policy)
        #[arg(long)]
        policy: Option<DeletePolicy>,
    },

    /// Products of a category
    Products {
        /// Category ID
        #[arg(long)]
        category: String,

        /// Include every descendant category
        #[arg(short, long)]
        recursive: bool,
    },
}

#[derive(Debug, Deserialize)]
struct DataFile {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    products: Vec<Product>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let data: DataFile = serde_json::from_str(&std::fs::read_to_string(&cli.data)?)?;
    let repository = InMemoryCatalogRepository::seeded(data.categories, data.products);
    let service = CatalogService::connect(repository, config).await?;

    match cli.command {
        Commands::Tree => {
            let (forest, report) = service.category_tree_report();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&forest)?),
                OutputFormat::Text => {
                    let aggregates = service.aggregates();
                    for root in &forest {
                        print_tree(root, &aggregates);
                    }
                    println!();
                    println!("{} categories, {} roots", forest_iter(&forest).count(), forest.len());
                    if !report.is_clean() {
                        println!();
                        println!("Promoted (dangling parent): {:?}", report.promoted_dangling);
                        println!("Promoted (cycle):           {:?}", report.promoted_cyclic);
                        println!("Duplicate ids:              {:?}", report.duplicate_ids);
                    }
                }
            }
        }

        Commands::Aggregate { id } => {
            let aggregate = service.aggregate(&id);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&aggregate)?),
                OutputFormat::Text => {
                    println!("Category:   {}", aggregate.category_id);
                    println!(
                        "  Products: {} direct, {} total",
                        aggregate.direct_product_count, aggregate.recursive_product_count
                    );
                    println!(
                        "  Price:    {:.2} direct, {:.2} total",
                        aggregate.direct_price_sum, aggregate.recursive_price_sum
                    );
                }
            }
        }

        Commands::Page { page, per_page } => {
            let per_page = per_page.unwrap_or(service.config().pagination.default_per_page);
            let page = service.product_page(page, per_page)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
                OutputFormat::Text => {
                    println!(
                        "Page {}/{} ({} products, {} per page)",
                        page.current_page, page.total_pages, page.total_items, page.per_page
                    );
                    for product in &page.items {
                        print_product(product);
                    }
                }
            }
        }

        Commands::DeleteCategory { id, policy } => {
            let policy = policy.unwrap_or(service.config().delete_policy);
            let outcome = service.delete_category_with(&id, policy).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                OutputFormat::Text => {
                    println!("Deleted {} ({})", id, policy);
                    println!("  Removed categories:    {:?}", outcome.removed_categories);
                    println!("  Removed products:      {:?}", outcome.removed_products);
                    println!("  Reparented categories: {:?}", outcome.reparented_categories);
                    println!("  Reassigned products:   {:?}", outcome.reassigned_products);
                    if let Some(fallback) = &outcome.fallback_category {
                        println!("  Fallback category:     {}", fallback);
                    }
                    println!();
                    let aggregates = service.aggregates();
                    for root in &service.category_tree() {
                        print_tree(root, &aggregates);
                    }
                }
            }
        }

        Commands::Products {
            category,
            recursive,
        } => {
            let products = service.products_in_category(&category, recursive);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&products)?),
                OutputFormat::Text => {
                    if products.is_empty() {
                        println!("No products in {}", category);
                    }
                    for product in &products {
                        print_product(product);
                    }
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CatalogConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => CatalogConfig::from_yaml(path)?,
        None => CatalogConfig::default(),
    };
    Ok(config.apply_env_overrides()?)
}

fn print_tree(root: &CategoryNode, aggregates: &HashMap<String, CategoryAggregate>) {
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let (count, sum) = aggregates
            .get(node.id())
            .map(|a| (a.recursive_product_count, a.recursive_price_sum))
            .unwrap_or((0, 0.0));
        println!(
            "{}{} [{}] ({} products, {:.2})",
            "  ".repeat(depth),
            node.name(),
            node.id(),
            count,
            sum
        );
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
}

fn print_product(product: &Product) {
    println!(
        "  {:<36} {:<24} {:>10.2}  stock {:<5} category {}",
        product.id, product.name, product.price, product.stock, product.category_id
    );
}
