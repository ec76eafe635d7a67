//! Aggregator - recursive per-category product statistics
//!
//! Products are bucketed by `category_id` once, then the forest is folded
//! children-first so every subtree total is computed exactly once
//! (O(categories + products)). Nothing is cached between calls.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::features::catalog::domain::{CategoryId, Product};
use crate::features::tree::{forest_iter, CategoryNode};

/// Product statistics for one category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub category_id: CategoryId,
    pub direct_product_count: usize,
    pub recursive_product_count: usize,
    pub direct_price_sum: f64,
    pub recursive_price_sum: f64,
}

impl CategoryAggregate {
    /// All-zero aggregate (unknown or empty category)
    pub fn empty(category_id: impl Into<CategoryId>) -> Self {
        Self {
            category_id: category_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: usize,
    price_sum: f64,
}

fn bucket_products(products: &[Product]) -> HashMap<&str, Bucket> {
    let mut buckets: HashMap<&str, Bucket> = HashMap::new();
    for product in products {
        let bucket = buckets.entry(product.category_id.as_str()).or_default();
        bucket.count += 1;
        bucket.price_sum += product.price;
    }
    buckets
}

// Reversed pre-order visits children before their parent, so each child's
// totals are already in `out` when the parent folds them in.
fn accumulate(
    root: &CategoryNode,
    buckets: &HashMap<&str, Bucket>,
    out: &mut HashMap<CategoryId, CategoryAggregate>,
) {
    let order: Vec<&CategoryNode> = root.iter().collect();
    for node in order.into_iter().rev() {
        let direct = buckets.get(node.id()).copied().unwrap_or_default();
        let mut count = direct.count;
        let mut price_sum = direct.price_sum;

        for child in &node.children {
            if let Some(totals) = out.get(child.id()) {
                count += totals.recursive_product_count;
                price_sum += totals.recursive_price_sum;
            }
        }

        out.insert(
            node.category.id.clone(),
            CategoryAggregate {
                category_id: node.category.id.clone(),
                direct_product_count: direct.count,
                recursive_product_count: count,
                direct_price_sum: direct.price_sum,
                recursive_price_sum: price_sum,
            },
        );
    }
}

/// Aggregates for every node of the forest
pub fn aggregate_forest(
    forest: &[CategoryNode],
    products: &[Product],
) -> HashMap<CategoryId, CategoryAggregate> {
    let buckets = bucket_products(products);
    let mut out = HashMap::new();
    for root in forest {
        accumulate(root, &buckets, &mut out);
    }
    out
}

/// Aggregate of a single subtree
pub fn aggregate_node(node: &CategoryNode, products: &[Product]) -> CategoryAggregate {
    let buckets = bucket_products(products);
    let mut out = HashMap::new();
    accumulate(node, &buckets, &mut out);
    out.remove(node.id())
        .unwrap_or_else(|| CategoryAggregate::empty(node.id()))
}

/// Aggregate of the category `id`; all zeros when it is not in the forest
pub fn aggregate_for(forest: &[CategoryNode], products: &[Product], id: &str) -> CategoryAggregate {
    match crate::features::tree::find_node(forest, id) {
        Some(node) => aggregate_node(node, products),
        None => CategoryAggregate::empty(id),
    }
}

pub fn recursive_product_count(forest: &[CategoryNode], products: &[Product], id: &str) -> usize {
    aggregate_for(forest, products, id).recursive_product_count
}

pub fn recursive_price_sum(forest: &[CategoryNode], products: &[Product], id: &str) -> f64 {
    aggregate_for(forest, products, id).recursive_price_sum
}

/// Products whose `category_id` does not resolve to any node of the forest
pub fn unresolved_products<'a>(forest: &[CategoryNode], products: &'a [Product]) -> Vec<&'a Product> {
    let known: HashSet<&str> = forest_iter(forest).map(|n| n.id()).collect();
    products
        .iter()
        .filter(|p| !known.contains(p.category_id.as_str()))
        .collect()
}
