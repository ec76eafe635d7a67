//! CatalogService - caller-facing facade
//!
//! Owns the flat store and the mutation coordinator. Reads take a fresh
//! snapshot and derive everything from it (tree, aggregates, pages) without
//! holding any lock; writes go through the coordinator.
//!
//! # Usage
//! ```rust,ignore
//! let service = CatalogService::connect(repository, CatalogConfig::default()).await?;
//! let tree = service.category_tree();
//! let totals = service.aggregate("1");
//! let page = service.product_page(1, 10)?;
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::features::aggregate::{aggregate_for, aggregate_forest, CategoryAggregate};
use crate::features::catalog::domain::{
    CatalogRepository, CatalogSnapshot, Category, CategoryId, CategoryInput, Product,
    ProductInput,
};
use crate::features::catalog::infrastructure::FlatStore;
use crate::features::mutation::{DeleteOutcome, DeletePolicy, MutationCoordinator};
use crate::features::pagination::{paginate, Page, PageRequest, Paginator};
use crate::features::tree::{
    ancestors, build_forest, build_forest_with_report, find_node, CategoryNode, ForestReport,
};

pub struct CatalogService<R: CatalogRepository> {
    store: FlatStore,
    coordinator: MutationCoordinator<R>,
    config: CatalogConfig,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// Service over an empty store; call [`refresh`](Self::refresh) to load it
    pub fn new(repository: R, config: CatalogConfig) -> Self {
        Self::with_shared(Arc::new(repository), config)
    }

    pub fn with_shared(repository: Arc<R>, config: CatalogConfig) -> Self {
        let store = FlatStore::new();
        let coordinator = MutationCoordinator::from_config(repository, store.clone(), &config);
        Self {
            store,
            coordinator,
            config,
        }
    }

    /// Construct and load from the repository
    pub async fn connect(repository: R, config: CatalogConfig) -> Result<Self> {
        let service = Self::new(repository, config);
        service.refresh().await?;
        Ok(service)
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn store(&self) -> &FlatStore {
        &self.store
    }

    pub fn repository(&self) -> &Arc<R> {
        self.coordinator.repository()
    }

    pub async fn refresh(&self) -> Result<()> {
        self.coordinator.refresh().await
    }

    pub fn needs_resync(&self) -> bool {
        self.coordinator.needs_resync()
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.store.snapshot()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Tree / aggregate reads
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub fn category_tree(&self) -> Vec<CategoryNode> {
        build_forest(&self.store.categories())
    }

    pub fn category_tree_report(&self) -> (Vec<CategoryNode>, ForestReport) {
        build_forest_with_report(&self.store.categories())
    }

    /// Aggregate for `id`; all zeros when the category is unknown
    pub fn aggregate(&self, id: &str) -> CategoryAggregate {
        let snapshot = self.store.snapshot();
        let forest = build_forest(&snapshot.categories);
        aggregate_for(&forest, &snapshot.products, id)
    }

    pub fn aggregates(&self) -> HashMap<CategoryId, CategoryAggregate> {
        let snapshot = self.store.snapshot();
        let forest = build_forest(&snapshot.categories);
        aggregate_forest(&forest, &snapshot.products)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Record reads
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub fn category(&self, id: &str) -> Option<Category> {
        self.store.category(id)
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        self.store.product(id)
    }

    /// Products of a category, or of its whole subtree when `recursive`
    ///
    /// Store order is kept. An unknown category has no products.
    pub fn products_in_category(&self, id: &str, recursive: bool) -> Vec<Product> {
        if !recursive {
            return self.store.products_in_category(id);
        }

        let snapshot = self.store.snapshot();
        let forest = build_forest(&snapshot.categories);
        let Some(node) = find_node(&forest, id) else {
            return Vec::new();
        };
        let subtree: HashSet<&str> = node.iter().map(|n| n.id()).collect();
        snapshot
            .products
            .iter()
            .filter(|p| subtree.contains(p.category_id.as_str()))
            .cloned()
            .collect()
    }

    /// Root-to-node path ending with `id`
    pub fn breadcrumb(&self, id: &str) -> Result<Vec<Category>> {
        let categories = self.store.categories();
        let target = categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::category_not_found(id))?;

        let mut path: Vec<Category> = ancestors(&categories, id)
            .into_iter()
            .rev()
            .filter_map(|ancestor| categories.iter().find(|c| c.id == ancestor).cloned())
            .collect();
        path.push(target);
        Ok(path)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Pagination
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Validated page over all products in store order
    pub fn product_page(&self, page: usize, per_page: usize) -> Result<Page<Product>> {
        let request = PageRequest::new(page, per_page);
        request.validate_within(self.config.pagination.max_per_page)?;
        paginate(&self.store.products(), request)
    }

    pub fn default_product_page(&self, page: usize) -> Result<Page<Product>> {
        self.product_page(page, self.config.pagination.default_per_page)
    }

    /// Fresh cursor with the configured page size
    pub fn paginator(&self) -> Result<Paginator> {
        Paginator::new(
            self.config.pagination.default_per_page,
            self.config.pagination.max_per_page,
        )
    }

    /// Page at the cursor, after moving it back in range if a mutation shrank the collection
    pub fn page_at(&self, paginator: &mut Paginator) -> Result<Page<Product>> {
        let products = self.store.products();
        paginator.reconcile(products.len());
        paginator.current(&products)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Writes
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category> {
        self.coordinator.create_category(input).await
    }

    pub async fn update_category(&self, id: &str, input: CategoryInput) -> Result<Category> {
        self.coordinator.update_category(id, input).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<DeleteOutcome> {
        self.coordinator.delete_category(id).await
    }

    pub async fn delete_category_with(
        &self,
        id: &str,
        policy: DeletePolicy,
    ) -> Result<DeleteOutcome> {
        self.coordinator.delete_category_with(id, policy).await
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product> {
        self.coordinator.create_product(input).await
    }

    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        self.coordinator.update_product(id, input).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<Product> {
        self.coordinator.delete_product(id).await
    }
}
