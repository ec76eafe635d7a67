//! Delete planning
//!
//! Turns "delete category X under policy P" into an ordered list of
//! single-record repository calls plus a summary of the effect. Planning is
//! pure: it reads a snapshot and never touches the store or the repository.
//!
//! # Step order
//! - `Cascade`: products of the subtree, then categories deepest-first, target last
//! - `Reparent`: child updates, product moves, then the target
//! - `Reject`: the target alone, and only when it has no children or products

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::policy::DeletePolicy;
use crate::error::{CatalogError, Result};
use crate::features::catalog::domain::{
    CatalogSnapshot, Category, CategoryId, CategoryInput, ProductId, ProductInput,
};

/// One repository call of a delete plan
#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryStep {
    DeleteProduct(ProductId),
    DeleteCategory(CategoryId),
    UpdateCategory { id: CategoryId, input: CategoryInput },
    UpdateProduct { id: ProductId, input: ProductInput },
}

impl RepositoryStep {
    pub fn describe(&self) -> String {
        match self {
            RepositoryStep::DeleteProduct(id) => format!("delete product {}", id),
            RepositoryStep::DeleteCategory(id) => format!("delete category {}", id),
            RepositoryStep::UpdateCategory { id, .. } => format!("update category {}", id),
            RepositoryStep::UpdateProduct { id, .. } => format!("update product {}", id),
        }
    }
}

/// Effect of a category delete, reported back to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub removed_categories: Vec<CategoryId>,
    pub removed_products: Vec<ProductId>,
    pub reparented_categories: Vec<CategoryId>,
    pub reassigned_products: Vec<ProductId>,
    /// Where a UI should move its selection (the deleted category's parent)
    pub fallback_category: Option<CategoryId>,
}

/// Ordered repository calls plus the outcome they produce
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePlan {
    pub target: CategoryId,
    pub policy: DeletePolicy,
    pub steps: Vec<RepositoryStep>,
    pub outcome: DeleteOutcome,
}

/// Plan the deletion of category `id`
///
/// # Errors
/// - `NotFound`: `id` is not in the snapshot
/// - `Validation`: `Reject` with children/products present, or `Reparent`
///   without a usable destination for the products of a root category
pub fn plan_delete(
    snapshot: &CatalogSnapshot,
    id: &str,
    policy: DeletePolicy,
    uncategorized: Option<&str>,
) -> Result<DeletePlan> {
    let target = snapshot
        .category(id)
        .ok_or_else(|| CatalogError::category_not_found(id))?;

    let plan = match policy {
        DeletePolicy::Cascade => plan_cascade(snapshot, target),
        DeletePolicy::Reparent => plan_reparent(snapshot, target, uncategorized)?,
        DeletePolicy::Reject => plan_reject(snapshot, target)?,
    };

    debug!(
        target = %plan.target,
        policy = %plan.policy,
        steps = plan.steps.len(),
        "delete planned"
    );
    Ok(plan)
}

fn children_index(categories: &[Category]) -> HashMap<&str, Vec<&Category>> {
    let mut index: HashMap<&str, Vec<&Category>> = HashMap::new();
    for category in categories {
        if let Some(parent) = category.parent_id.as_deref() {
            index.entry(parent).or_default().push(category);
        }
    }
    index
}

/// Resolved parent of `category`; a dangling reference counts as none
fn live_parent(snapshot: &CatalogSnapshot, category: &Category) -> Option<CategoryId> {
    category
        .parent_id
        .as_deref()
        .filter(|p| snapshot.category(p).is_some())
        .map(str::to_string)
}

// Post-order over the subtree rooted at `root`, so descendants come before
// their ancestors and the root comes last. Children keep snapshot order.
fn subtree_post_order<'a>(
    root: &'a str,
    children: &HashMap<&str, Vec<&'a Category>>,
) -> Vec<&'a str> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    // (id, children already pushed)
    let mut stack: Vec<(&'a str, bool)> = vec![(root, false)];

    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            out.push(id);
            continue;
        }
        if !visited.insert(id) {
            continue;
        }
        stack.push((id, true));
        if let Some(kids) = children.get(id) {
            stack.extend(kids.iter().rev().map(|child| (child.id.as_str(), false)));
        }
    }
    out
}

fn plan_cascade(snapshot: &CatalogSnapshot, target: &Category) -> DeletePlan {
    let children = children_index(&snapshot.categories);
    let order = subtree_post_order(target.id.as_str(), &children);

    let subtree: HashSet<&str> = order.iter().copied().collect();
    let doomed_products: Vec<ProductId> = snapshot
        .products
        .iter()
        .filter(|p| subtree.contains(p.category_id.as_str()))
        .map(|p| p.id.clone())
        .collect();
    let doomed_categories: Vec<CategoryId> = order.iter().map(|s| s.to_string()).collect();
    let fallback_category =
        live_parent(snapshot, target).filter(|parent| !subtree.contains(parent.as_str()));

    let steps = doomed_products
        .iter()
        .cloned()
        .map(RepositoryStep::DeleteProduct)
        .chain(doomed_categories.iter().cloned().map(RepositoryStep::DeleteCategory))
        .collect();

    DeletePlan {
        target: target.id.clone(),
        policy: DeletePolicy::Cascade,
        steps,
        outcome: DeleteOutcome {
            removed_categories: doomed_categories,
            removed_products: doomed_products,
            fallback_category,
            ..DeleteOutcome::default()
        },
    }
}

fn plan_reparent(
    snapshot: &CatalogSnapshot,
    target: &Category,
    uncategorized: Option<&str>,
) -> Result<DeletePlan> {
    if uncategorized == Some(target.id.as_str()) {
        return Err(CatalogError::validation(format!(
            "category {} is the uncategorized fallback and cannot be deleted under the reparent policy",
            target.id
        )));
    }

    let new_parent = live_parent(snapshot, target);
    let mut steps = Vec::new();
    let mut outcome = DeleteOutcome {
        fallback_category: new_parent.clone(),
        ..DeleteOutcome::default()
    };

    for child in snapshot
        .categories
        .iter()
        .filter(|c| c.parent_id.as_deref() == Some(target.id.as_str()) && c.id != target.id)
    {
        steps.push(RepositoryStep::UpdateCategory {
            id: child.id.clone(),
            input: CategoryInput {
                name: child.name.clone(),
                parent_id: new_parent.clone(),
            },
        });
        outcome.reparented_categories.push(child.id.clone());
    }

    let direct_products: Vec<_> = snapshot
        .products
        .iter()
        .filter(|p| p.category_id == target.id)
        .collect();

    if !direct_products.is_empty() {
        let destination = match &new_parent {
            Some(parent) => parent.clone(),
            None => uncategorized
                .filter(|u| snapshot.category(u).is_some())
                .map(str::to_string)
                .ok_or_else(|| {
                    CatalogError::validation(format!(
                        "root category {} has products but no uncategorized category is available",
                        target.id
                    ))
                })?,
        };

        for product in direct_products {
            let mut input = product.to_input();
            input.category_id = destination.clone();
            steps.push(RepositoryStep::UpdateProduct {
                id: product.id.clone(),
                input,
            });
            outcome.reassigned_products.push(product.id.clone());
        }
    }

    steps.push(RepositoryStep::DeleteCategory(target.id.clone()));
    outcome.removed_categories.push(target.id.clone());

    Ok(DeletePlan {
        target: target.id.clone(),
        policy: DeletePolicy::Reparent,
        steps,
        outcome,
    })
}

fn plan_reject(snapshot: &CatalogSnapshot, target: &Category) -> Result<DeletePlan> {
    let child_count = snapshot
        .categories
        .iter()
        .filter(|c| c.parent_id.as_deref() == Some(target.id.as_str()) && c.id != target.id)
        .count();
    let product_count = snapshot
        .products
        .iter()
        .filter(|p| p.category_id == target.id)
        .count();

    if child_count > 0 || product_count > 0 {
        return Err(CatalogError::validation(format!(
            "category {} still has {} subcategories and {} products",
            target.id, child_count, product_count
        )));
    }

    Ok(DeletePlan {
        target: target.id.clone(),
        policy: DeletePolicy::Reject,
        steps: vec![RepositoryStep::DeleteCategory(target.id.clone())],
        outcome: DeleteOutcome {
            removed_categories: vec![target.id.clone()],
            fallback_category: live_parent(snapshot, target),
            ..DeleteOutcome::default()
        },
    })
}
