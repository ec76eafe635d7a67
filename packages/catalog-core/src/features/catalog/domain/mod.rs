//! Catalog domain layer
//!
//! # Domain Models
//!
//! - `Category`, `Product`: authoritative records
//! - `CategoryInput`, `ProductInput`: write payloads
//! - `CatalogSnapshot`: immutable copy handed to the derivation functions
//!
//! # Port Trait
//!
//! - `CatalogRepository`: the external request/response collaborator

pub mod models;
pub mod ports;

pub use models::{
    CatalogSnapshot, Category, CategoryId, CategoryInput, Product, ProductId, ProductInput,
};
pub use ports::CatalogRepository;
