//! Repository doubles
//!
//! - `FlakyRepository`: delegates to an in-memory repository, but fails one
//!   chosen operation with a transport error after `n` successful calls
//! - `StallingRepository`: one chosen operation never resolves

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use catalog_core::features::pagination::PageRequest;
use catalog_core::{
    CatalogError, CatalogRepository, Category, CategoryInput, InMemoryCatalogRepository,
    Product, ProductInput, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    ListCategories,
    ListProducts,
    GetProduct,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

// ═══════════════════════════════════════════════════════════════════════════
// FlakyRepository
// ═══════════════════════════════════════════════════════════════════════════

pub struct FlakyRepository {
    inner: InMemoryCatalogRepository,
    fail_on: Op,
    successes_left: AtomicUsize,
    armed: AtomicBool,
}

impl FlakyRepository {
    /// Fails the first call of `fail_on`
    pub fn new(inner: InMemoryCatalogRepository, fail_on: Op) -> Self {
        Self {
            inner,
            fail_on,
            successes_left: AtomicUsize::new(0),
            armed: AtomicBool::new(true),
        }
    }

    /// Let `n` calls of the chosen operation through before failing
    pub fn after(self, n: usize) -> Self {
        self.successes_left.store(n, Ordering::SeqCst);
        self
    }

    /// Stop failing (simulates the remote side recovering)
    pub fn heal(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    /// The remote state, for assertions
    pub fn remote(&self) -> &InMemoryCatalogRepository {
        &self.inner
    }

    fn check(&self, op: Op) -> Result<()> {
        if op != self.fail_on || !self.armed.load(Ordering::SeqCst) {
            return Ok(());
        }
        let left = self.successes_left.load(Ordering::SeqCst);
        if left > 0 {
            self.successes_left.store(left - 1, Ordering::SeqCst);
            return Ok(());
        }
        Err(CatalogError::transport(format!("injected failure on {:?}", op)))
    }
}

#[async_trait]
impl CatalogRepository for FlakyRepository {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.check(Op::ListCategories)?;
        self.inner.list_categories().await
    }

    async fn list_products(&self, page: Option<PageRequest>) -> Result<Vec<Product>> {
        self.check(Op::ListProducts)?;
        self.inner.list_products(page).await
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        self.check(Op::GetProduct)?;
        self.inner.get_product(id).await
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category> {
        self.check(Op::CreateCategory)?;
        self.inner.create_category(input).await
    }

    async fn update_category(&self, id: &str, input: &CategoryInput) -> Result<Category> {
        self.check(Op::UpdateCategory)?;
        self.inner.update_category(id, input).await
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        self.check(Op::DeleteCategory)?;
        self.inner.delete_category(id).await
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        self.check(Op::CreateProduct)?;
        self.inner.create_product(input).await
    }

    async fn update_product(&self, id: &str, input: &ProductInput) -> Result<Product> {
        self.check(Op::UpdateProduct)?;
        self.inner.update_product(id, input).await
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        self.check(Op::DeleteProduct)?;
        self.inner.delete_product(id).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// StallingRepository
// ═══════════════════════════════════════════════════════════════════════════

pub struct StallingRepository {
    inner: InMemoryCatalogRepository,
    stall_on: Op,
}

impl StallingRepository {
    pub fn new(inner: InMemoryCatalogRepository, stall_on: Op) -> Self {
        Self { inner, stall_on }
    }

    pub fn remote(&self) -> &InMemoryCatalogRepository {
        &self.inner
    }

    async fn gate(&self, op: Op) {
        if op == self.stall_on {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl CatalogRepository for StallingRepository {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.gate(Op::ListCategories).await;
        self.inner.list_categories().await
    }

    async fn list_products(&self, page: Option<PageRequest>) -> Result<Vec<Product>> {
        self.gate(Op::ListProducts).await;
        self.inner.list_products(page).await
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        self.gate(Op::GetProduct).await;
        self.inner.get_product(id).await
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category> {
        self.gate(Op::CreateCategory).await;
        self.inner.create_category(input).await
    }

    async fn update_category(&self, id: &str, input: &CategoryInput) -> Result<Category> {
        self.gate(Op::UpdateCategory).await;
        self.inner.update_category(id, input).await
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        self.gate(Op::DeleteCategory).await;
        self.inner.delete_category(id).await
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        self.gate(Op::CreateProduct).await;
        self.inner.create_product(input).await
    }

    async fn update_product(&self, id: &str, input: &ProductInput) -> Result<Product> {
        self.gate(Op::UpdateProduct).await;
        self.inner.update_product(id, input).await
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        self.gate(Op::DeleteProduct).await;
        self.inner.delete_product(id).await
    }
}
