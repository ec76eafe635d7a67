//! Flat Store
//!
//! Authoritative in-process copy of the category and product collections.
//! Every read hands out an owned snapshot, every write is applied under a
//! single write lock and bumps the store version. Nothing here awaits:
//! repository round-trips happen in the mutation coordinator *before* a
//! commit reaches this type.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::error::{CatalogError, Result};
use crate::features::catalog::domain::{CatalogSnapshot, Category, CategoryId, Product, ProductId};

/// Multi-record write applied atomically by [`FlatStore::apply`]
///
/// Upserts run before removals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub upsert_categories: Vec<Category>,
    pub upsert_products: Vec<Product>,
    pub remove_categories: Vec<CategoryId>,
    pub remove_products: Vec<ProductId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.upsert_categories.is_empty()
            && self.upsert_products.is_empty()
            && self.remove_categories.is_empty()
            && self.remove_products.is_empty()
    }
}

#[derive(Debug, Default)]
struct StoreState {
    // BTreeMap keeps snapshot order stable (by id)
    categories: BTreeMap<CategoryId, Category>,
    // insertion order; this is the order pagination slices
    products: Vec<Product>,
    // id -> position in `products`
    product_slots: HashMap<ProductId, usize>,
    version: u64,
}

impl StoreState {
    fn product_index(&self, id: &str) -> Option<usize> {
        self.product_slots.get(id).copied()
    }

    fn put_product(&mut self, product: Product) {
        match self.product_index(&product.id) {
            Some(idx) => self.products[idx] = product,
            None => {
                self.product_slots
                    .insert(product.id.clone(), self.products.len());
                self.products.push(product);
            }
        }
    }

    /// Rebuild slots after products were removed from the middle
    fn reindex_products(&mut self) {
        self.product_slots = self
            .products
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id.clone(), idx))
            .collect();
    }
}

#[derive(Clone, Default)]
pub struct FlatStore {
    state: Arc<RwLock<StoreState>>,
}

impl FlatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records (version starts at 1)
    pub fn with_records(categories: Vec<Category>, products: Vec<Product>) -> Self {
        let store = Self::new();
        store.replace_all(categories, products);
        store
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Reads (snapshots)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub fn categories(&self) -> Vec<Category> {
        self.state.read().categories.values().cloned().collect()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.read().products.clone()
    }

    /// Both collections copied under one lock acquisition
    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.state.read();
        CatalogSnapshot::new(
            state.categories.values().cloned().collect(),
            state.products.clone(),
            state.version,
        )
    }

    pub fn category(&self, id: &str) -> Option<Category> {
        self.state.read().categories.get(id).cloned()
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        let state = self.state.read();
        state.product_index(id).map(|idx| state.products[idx].clone())
    }

    pub fn contains_category(&self, id: &str) -> bool {
        self.state.read().categories.contains_key(id)
    }

    /// Products whose `category_id` is exactly `id` (no descendants)
    pub fn products_in_category(&self, id: &str) -> Vec<Product> {
        self.state
            .read()
            .products
            .iter()
            .filter(|p| p.category_id == id)
            .cloned()
            .collect()
    }

    pub fn category_count(&self) -> usize {
        self.state.read().categories.len()
    }

    pub fn product_count(&self) -> usize {
        self.state.read().products.len()
    }

    /// Monotonic revision, bumped by every successful write
    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Writes
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Insert or replace a category
    pub fn upsert_category(&self, category: Category) {
        let mut state = self.state.write();
        state.categories.insert(category.id.clone(), category);
        state.version += 1;
    }

    /// Replace an existing category
    pub fn update_category(&self, category: Category) -> Result<()> {
        let mut state = self.state.write();
        match state.categories.get_mut(&category.id) {
            Some(slot) => *slot = category,
            None => return Err(CatalogError::category_not_found(category.id)),
        }
        state.version += 1;
        Ok(())
    }

    pub fn remove_category(&self, id: &str) -> Result<Category> {
        let mut state = self.state.write();
        let removed = state
            .categories
            .remove(id)
            .ok_or_else(|| CatalogError::category_not_found(id))?;
        state.version += 1;
        Ok(removed)
    }

    /// Insert or replace a product; a replaced product keeps its position
    pub fn upsert_product(&self, product: Product) {
        let mut state = self.state.write();
        state.put_product(product);
        state.version += 1;
    }

    /// Replace an existing product in place
    pub fn update_product(&self, product: Product) -> Result<()> {
        let mut state = self.state.write();
        let idx = state
            .product_index(&product.id)
            .ok_or_else(|| CatalogError::product_not_found(&product.id))?;
        state.products[idx] = product;
        state.version += 1;
        Ok(())
    }

    pub fn remove_product(&self, id: &str) -> Result<Product> {
        let mut state = self.state.write();
        let idx = state
            .product_index(id)
            .ok_or_else(|| CatalogError::product_not_found(id))?;
        let removed = state.products.remove(idx);
        state.reindex_products();
        state.version += 1;
        Ok(removed)
    }

    /// Replace both collections wholesale (resync)
    pub fn replace_all(&self, categories: Vec<Category>, products: Vec<Product>) {
        let mut state = self.state.write();
        state.categories = categories.into_iter().map(|c| (c.id.clone(), c)).collect();
        state.products.clear();
        state.product_slots.clear();
        for product in products {
            state.put_product(product);
        }
        state.version += 1;
    }

    /// Apply a multi-record change atomically
    ///
    /// Every removal target must exist; if one does not, nothing is applied.
    pub fn apply(&self, changes: ChangeSet) -> Result<()> {
        let mut state = self.state.write();

        for id in &changes.remove_categories {
            let upserted = changes.upsert_categories.iter().any(|c| &c.id == id);
            if !state.categories.contains_key(id) && !upserted {
                return Err(CatalogError::category_not_found(id));
            }
        }
        for id in &changes.remove_products {
            let upserted = changes.upsert_products.iter().any(|p| &p.id == id);
            if state.product_index(id).is_none() && !upserted {
                return Err(CatalogError::product_not_found(id));
            }
        }

        for category in changes.upsert_categories {
            state.categories.insert(category.id.clone(), category);
        }
        for product in changes.upsert_products {
            state.put_product(product);
        }
        for id in &changes.remove_categories {
            state.categories.remove(id);
        }
        if !changes.remove_products.is_empty() {
            let doomed: HashSet<&str> = changes.remove_products.iter().map(String::as_str).collect();
            state.products.retain(|p| !doomed.contains(p.id.as_str()));
            state.reindex_products();
        }

        state.version += 1;
        Ok(())
    }
}

impl std::fmt::Debug for FlatStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("FlatStore")
            .field("categories", &state.categories.len())
            .field("products", &state.products.len())
            .field("version", &state.version)
            .finish()
    }
}
