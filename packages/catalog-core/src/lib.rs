/*
 * Catalog Core - category hierarchy and product catalog engine
 *
 * Feature-First Hexagonal Architecture:
 * - features/catalog    : Records, repository port, Flat Store, in-memory adapter
 * - features/tree       : Tree Builder (flat categories → ordered forest)
 * - features/aggregate  : Recursive product counts and price sums
 * - features/pagination : Page slicing and page cursor
 * - features/mutation   : Delete planning and the single write path
 * - api/                : CatalogService facade
 *
 * Derived views (tree, aggregates, pages) are recomputed from a store
 * snapshot on every read and never patched in place.
 */

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports
// ═══════════════════════════════════════════════════════════════════════════

/// Error types
pub mod error;

/// Configuration (YAML schema v1 + env overrides)
pub mod config;

/// Feature modules
pub mod features;

/// Caller-facing API
pub mod api;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use api::CatalogService;
pub use config::{CatalogConfig, ConfigError, PaginationConfig};
pub use error::{CatalogError, ErrorKind, Result};
pub use features::aggregate::CategoryAggregate;
pub use features::catalog::{
    CatalogRepository, CatalogSnapshot, Category, CategoryId, CategoryInput, FlatStore,
    InMemoryCatalogRepository, Product, ProductId, ProductInput,
};
pub use features::mutation::{DeleteOutcome, DeletePolicy, MutationCoordinator};
pub use features::pagination::{Page, PageRequest, Paginator};
pub use features::tree::{CategoryNode, ForestReport};
