//! In-Memory Catalog Repository
//!
//! HashMap-based stand-in for the remote catalog API. Behaves like the
//! reference server: flat deletes, no referential checks, generated ids.
//! Used by tests and the CLI.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::features::catalog::domain::{
    CatalogRepository, Category, CategoryInput, Product, ProductInput,
};
use crate::features::pagination::{paginate, PageRequest};

#[derive(Debug, Default)]
struct RepositoryState {
    categories: HashMap<String, Category>,
    products: HashMap<String, Product>,
    // server-side listing order
    product_order: Vec<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<RepositoryState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with existing records
    pub fn seeded(categories: Vec<Category>, products: Vec<Product>) -> Self {
        let repo = Self::new();
        {
            let mut state = repo.state.write();
            for category in categories {
                state.categories.insert(category.id.clone(), category);
            }
            for product in products {
                if !state.products.contains_key(&product.id) {
                    state.product_order.push(product.id.clone());
                }
                state.products.insert(product.id.clone(), product);
            }
        }
        repo
    }

    pub fn category_count(&self) -> usize {
        self.state.read().categories.len()
    }

    pub fn product_count(&self) -> usize {
        self.state.read().products.len()
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.state.read();
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(categories)
    }

    async fn list_products(&self, page: Option<PageRequest>) -> Result<Vec<Product>> {
        let state = self.state.read();
        let products: Vec<Product> = state
            .product_order
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect();

        match page {
            Some(request) => Ok(paginate(&products, request)?.items),
            None => Ok(products),
        }
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.state.read().products.get(id).cloned())
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category> {
        let category = Category::from_input(Self::next_id(), input);
        self.state
            .write()
            .categories
            .insert(category.id.clone(), category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: &str, input: &CategoryInput) -> Result<Category> {
        let mut state = self.state.write();
        let slot = state
            .categories
            .get_mut(id)
            .ok_or_else(|| CatalogError::transport(format!("server: no category {id}")))?;
        *slot = Category::from_input(id, input);
        Ok(slot.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        self.state
            .write()
            .categories
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::transport(format!("server: no category {id}")))
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        let product = Product::from_input(Self::next_id(), input);
        let mut state = self.state.write();
        state.product_order.push(product.id.clone());
        state.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &str, input: &ProductInput) -> Result<Product> {
        let mut state = self.state.write();
        let slot = state
            .products
            .get_mut(id)
            .ok_or_else(|| CatalogError::transport(format!("server: no product {id}")))?;
        *slot = Product::from_input(id, input);
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.products.remove(id).is_none() {
            return Err(CatalogError::transport(format!("server: no product {id}")));
        }
        state.product_order.retain(|p| p != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let repo = InMemoryCatalogRepository::new();
        let a = repo.create_category(&CategoryInput::new("A")).await.unwrap();
        let b = repo.create_category(&CategoryInput::new("B")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.category_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_category_is_flat() {
        let repo = InMemoryCatalogRepository::seeded(
            vec![
                Category::new("1", "Electronics"),
                Category::new("2", "Laptops").with_parent("1"),
            ],
            vec![Product::new("p2", "Product 2", 200.0, "2")],
        );

        repo.delete_category("1").await.unwrap();

        // child and product are left dangling, like the reference server
        assert_eq!(repo.category_count(), 1);
        assert_eq!(repo.product_count(), 1);
    }

    #[tokio::test]
    async fn test_list_products_keeps_creation_order() {
        let repo = InMemoryCatalogRepository::new();
        for name in ["first", "second", "third"] {
            repo.create_product(&ProductInput::new(name, 1.0, "1"))
                .await
                .unwrap();
        }

        let names: Vec<String> = repo
            .list_products(None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);

        let page = repo
            .list_products(Some(PageRequest::new(2, 2)))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "third");
    }

    #[tokio::test]
    async fn test_missing_records_are_transport_errors() {
        let repo = InMemoryCatalogRepository::new();
        let err = repo.delete_product("ghost").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);

        let err = repo
            .update_category("ghost", &CategoryInput::new("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
    }
}
