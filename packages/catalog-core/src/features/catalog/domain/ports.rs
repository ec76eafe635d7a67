//! Repository Port (Trait Interface)
//!
//! The catalog core never talks to a transport directly. Whatever sits behind
//! this trait (GraphQL client, REST client, in-memory fake) owns the wire
//! format; the core only sees records and `CatalogError`s.

use async_trait::async_trait;

use super::models::{Category, CategoryInput, Product, ProductInput};
use crate::error::Result;
use crate::features::pagination::PageRequest;

/// Catalog Repository Port (Primary Interface)
///
/// Each call is a suspension point. Implementations report transport and
/// server faults with `ErrorKind::Transport`.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Reads
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// List every category
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// List products, optionally one page of them (`None` = everything)
    async fn list_products(&self, page: Option<PageRequest>) -> Result<Vec<Product>>;

    /// Get product by ID
    async fn get_product(&self, id: &str) -> Result<Option<Product>>;

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Category writes
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Create a category; the repository assigns the id
    async fn create_category(&self, input: &CategoryInput) -> Result<Category>;

    /// Replace name/parent of an existing category
    async fn update_category(&self, id: &str, input: &CategoryInput) -> Result<Category>;

    /// Delete a single category record (no cascade on the repository side)
    async fn delete_category(&self, id: &str) -> Result<()>;

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Product writes
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Create a product; the repository assigns the id
    async fn create_product(&self, input: &ProductInput) -> Result<Product>;

    /// Replace every field of an existing product
    async fn update_product(&self, id: &str, input: &ProductInput) -> Result<Product>;

    /// Delete a single product record
    async fn delete_product(&self, id: &str) -> Result<()>;
}
