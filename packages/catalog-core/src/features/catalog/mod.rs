//! Catalog records and their authoritative store
//!
//! # Hexagonal Architecture
//! ```text
//! api::CatalogService
//!           ↓
//! features::mutation (write path)
//!           ↓
//! domain/ (records, CatalogRepository port)
//!           ↓
//! infrastructure/ (FlatStore, InMemoryCatalogRepository)
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{
    CatalogRepository, CatalogSnapshot, Category, CategoryId, CategoryInput, Product, ProductId,
    ProductInput,
};
pub use infrastructure::{ChangeSet, FlatStore, InMemoryCatalogRepository};
