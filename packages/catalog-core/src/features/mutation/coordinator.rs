//! Mutation Coordinator - the single write path
//!
//! Every write follows the same two phases:
//!
//! 1. **Validate locally** against a store snapshot (shape, references, cycles,
//!    delete policy). Nothing leaves the process if this fails.
//! 2. **Await the repository**, then commit what it returned to the
//!    [`FlatStore`] in one synchronous step.
//!
//! There is no await between the last repository call and the commit, so a
//! caller that drops the future either sees the commit or leaves the store
//! untouched. A multi-call delete that stops after some calls landed (error or
//! dropped future) raises `needs_resync`. Writes are serialised by an async
//! write gate; reads never take the gate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::delete_plan::{plan_delete, DeleteOutcome, DeletePlan, RepositoryStep};
use super::policy::DeletePolicy;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, ErrorKind, Result};
use crate::features::catalog::domain::{
    CatalogRepository, Category, CategoryId, CategoryInput, Product, ProductInput,
};
use crate::features::catalog::infrastructure::{ChangeSet, FlatStore};
use crate::features::tree::would_create_cycle;

pub struct MutationCoordinator<R: CatalogRepository> {
    repository: Arc<R>,
    store: FlatStore,
    write_gate: Mutex<()>,
    delete_policy: DeletePolicy,
    uncategorized_category_id: Option<CategoryId>,
    needs_resync: AtomicBool,
}

impl<R: CatalogRepository> MutationCoordinator<R> {
    pub fn new(repository: Arc<R>, store: FlatStore) -> Self {
        Self {
            repository,
            store,
            write_gate: Mutex::new(()),
            delete_policy: DeletePolicy::default(),
            uncategorized_category_id: None,
            needs_resync: AtomicBool::new(false),
        }
    }

    /// Coordinator with the delete settings of `config`
    pub fn from_config(repository: Arc<R>, store: FlatStore, config: &CatalogConfig) -> Self {
        Self::new(repository, store)
            .with_delete_policy(config.delete_policy)
            .with_uncategorized(config.uncategorized_category_id.clone())
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn with_uncategorized(mut self, category_id: Option<CategoryId>) -> Self {
        self.uncategorized_category_id = category_id;
        self
    }

    pub fn store(&self) -> &FlatStore {
        &self.store
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// True after a multi-call delete stopped part-way; cleared by `refresh`
    pub fn needs_resync(&self) -> bool {
        self.needs_resync.load(Ordering::SeqCst)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Resync
    // ═══════════════════════════════════════════════════════════════════════

    /// Reload both collections from the repository and replace the store
    pub async fn refresh(&self) -> Result<()> {
        let _gate = self.write_gate.lock().await;

        let categories = self
            .repository
            .list_categories()
            .await
            .map_err(|e| self.transport_failure("list_categories", e))?;
        let products = self
            .repository
            .list_products(None)
            .await
            .map_err(|e| self.transport_failure("list_products", e))?;

        let (category_count, product_count) = (categories.len(), products.len());
        self.store.replace_all(categories, products);
        self.needs_resync.store(false, Ordering::SeqCst);

        info!(
            categories = category_count,
            products = product_count,
            version = self.store.version(),
            "catalog refreshed"
        );
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Categories
    // ═══════════════════════════════════════════════════════════════════════

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category> {
        let _gate = self.write_gate.lock().await;

        if let Some(parent) = input.parent_id.as_deref() {
            if !self.store.contains_category(parent) {
                return Err(CatalogError::category_not_found(parent));
            }
        }
        input.validate()?;

        let created = self
            .repository
            .create_category(&input)
            .await
            .map_err(|e| self.transport_failure("create_category", e))?;

        self.store.upsert_category(created.clone());
        self.committed("create_category", &created.id);
        Ok(created)
    }

    /// Rename and/or move a category
    ///
    /// # Errors
    /// - `NotFound`: unknown `id` or unknown new parent
    /// - `CyclicReference`: the new parent is `id` itself or one of its descendants
    /// - `Validation`: malformed input
    pub async fn update_category(&self, id: &str, input: CategoryInput) -> Result<Category> {
        let _gate = self.write_gate.lock().await;

        let categories = self.store.categories();
        if !categories.iter().any(|c| c.id == id) {
            return Err(CatalogError::category_not_found(id));
        }
        if let Some(parent) = input.parent_id.as_deref() {
            if parent != id && !categories.iter().any(|c| c.id == parent) {
                return Err(CatalogError::category_not_found(parent));
            }
            if would_create_cycle(&categories, id, parent) {
                return Err(CatalogError::cyclic_reference(id, parent));
            }
        }
        input.validate()?;

        let updated = self
            .repository
            .update_category(id, &input)
            .await
            .map_err(|e| self.transport_failure("update_category", e))?;

        self.store.update_category(updated.clone())?;
        self.committed("update_category", id);
        Ok(updated)
    }

    /// Delete a category under the configured policy
    pub async fn delete_category(&self, id: &str) -> Result<DeleteOutcome> {
        self.delete_category_with(id, self.delete_policy).await
    }

    /// Delete a category under an explicit policy
    pub async fn delete_category_with(
        &self,
        id: &str,
        policy: DeletePolicy,
    ) -> Result<DeleteOutcome> {
        let _gate = self.write_gate.lock().await;

        let snapshot = self.store.snapshot();
        let plan = plan_delete(
            &snapshot,
            id,
            policy,
            self.uncategorized_category_id.as_deref(),
        )?;

        self.execute(&plan).await?;
        self.committed("delete_category", id);
        Ok(plan.outcome)
    }

    // Runs the plan's repository calls in order, then commits what they
    // returned in one `apply`. Once any call has landed, leaving before the
    // commit (error or drop) raises the resync flag.
    async fn execute(&self, plan: &DeletePlan) -> Result<()> {
        let mut changes = ChangeSet::default();
        let mut divergence = DivergenceGuard::new(&self.needs_resync);

        for (done, step) in plan.steps.iter().enumerate() {
            debug!(target_id = %plan.target, step = %step.describe(), "delete step");

            let result = match step {
                RepositoryStep::DeleteProduct(product_id) => self
                    .repository
                    .delete_product(product_id)
                    .await
                    .map(|_| changes.remove_products.push(product_id.clone())),
                RepositoryStep::DeleteCategory(category_id) => self
                    .repository
                    .delete_category(category_id)
                    .await
                    .map(|_| changes.remove_categories.push(category_id.clone())),
                RepositoryStep::UpdateCategory { id, input } => self
                    .repository
                    .update_category(id, input)
                    .await
                    .map(|category| changes.upsert_categories.push(category)),
                RepositoryStep::UpdateProduct { id, input } => self
                    .repository
                    .update_product(id, input)
                    .await
                    .map(|product| changes.upsert_products.push(product)),
            };

            if let Err(err) = result {
                warn!(
                    target_id = %plan.target,
                    step = %step.describe(),
                    completed = done,
                    total = plan.steps.len(),
                    error = %err,
                    "delete aborted, local store left unchanged"
                );
                return Err(as_transport(err));
            }
            divergence.arm();
        }

        self.store.apply(changes)?;
        divergence.disarm();
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Products
    // ═══════════════════════════════════════════════════════════════════════

    pub async fn create_product(&self, input: ProductInput) -> Result<Product> {
        let _gate = self.write_gate.lock().await;

        if !self.store.contains_category(&input.category_id) {
            return Err(CatalogError::category_not_found(&input.category_id));
        }
        input.validate()?;

        let created = self
            .repository
            .create_product(&input)
            .await
            .map_err(|e| self.transport_failure("create_product", e))?;

        self.store.upsert_product(created.clone());
        self.committed("create_product", &created.id);
        Ok(created)
    }

    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        let _gate = self.write_gate.lock().await;

        if self.store.product(id).is_none() {
            return Err(CatalogError::product_not_found(id));
        }
        if !self.store.contains_category(&input.category_id) {
            return Err(CatalogError::category_not_found(&input.category_id));
        }
        input.validate()?;

        let updated = self
            .repository
            .update_product(id, &input)
            .await
            .map_err(|e| self.transport_failure("update_product", e))?;

        self.store.update_product(updated.clone())?;
        self.committed("update_product", id);
        Ok(updated)
    }

    pub async fn delete_product(&self, id: &str) -> Result<Product> {
        let _gate = self.write_gate.lock().await;

        if self.store.product(id).is_none() {
            return Err(CatalogError::product_not_found(id));
        }

        self.repository
            .delete_product(id)
            .await
            .map_err(|e| self.transport_failure("delete_product", e))?;

        let removed = self.store.remove_product(id)?;
        self.committed("delete_product", id);
        Ok(removed)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Helpers
    // ═══════════════════════════════════════════════════════════════════════

    fn committed(&self, op: &'static str, id: &str) {
        info!(op, id, version = self.store.version(), "mutation committed");
    }

    fn transport_failure(&self, op: &'static str, err: CatalogError) -> CatalogError {
        warn!(op, error = %err, "repository call failed, local store left unchanged");
        as_transport(err)
    }
}

/// Raises the resync flag on drop unless the write was committed
struct DivergenceGuard<'a> {
    flag: &'a AtomicBool,
    armed: bool,
}

impl<'a> DivergenceGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        Self { flag, armed: false }
    }

    /// A repository call has landed
    fn arm(&mut self) {
        self.armed = true;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for DivergenceGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("delete stopped after remote changes, store needs resync");
            self.flag.store(true, Ordering::SeqCst);
        }
    }
}

fn as_transport(err: CatalogError) -> CatalogError {
    if err.kind == ErrorKind::Transport {
        return err;
    }
    CatalogError::transport(format!("repository rejected the call: {}", err.message)).with_source(err)
}
