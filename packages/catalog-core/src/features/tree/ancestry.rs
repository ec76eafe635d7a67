//! Upward walks over `parent_id` chains
//!
//! Every walk carries a visited set, so cyclic or dangling parent chains end
//! the walk instead of looping.

use std::collections::{HashMap, HashSet};

use crate::features::catalog::domain::{Category, CategoryId};

/// Ancestors of `id`, nearest first (parent, grandparent, ... root)
///
/// Stops at a root, at a dangling parent reference, or when the chain
/// revisits a category. Unknown `id` yields an empty chain.
pub fn ancestors(categories: &[Category], id: &str) -> Vec<CategoryId> {
    let parents = parent_index(categories);
    let mut chain = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(id);

    let mut current = parents.get(id).copied().flatten();
    while let Some(parent) = current {
        if !parents.contains_key(parent) || !visited.insert(parent) {
            break;
        }
        chain.push(parent.to_string());
        current = parents.get(parent).copied().flatten();
    }
    chain
}

/// Would re-parenting `id` under `new_parent` make `id` its own ancestor?
pub fn would_create_cycle(categories: &[Category], id: &str, new_parent: &str) -> bool {
    if id == new_parent {
        return true;
    }
    let parents = parent_index(categories);
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = Some(new_parent);
    while let Some(node) = current {
        if node == id {
            return true;
        }
        if !visited.insert(node) {
            return false;
        }
        current = parents.get(node).copied().flatten();
    }
    false
}

fn parent_index(categories: &[Category]) -> HashMap<&str, Option<&str>> {
    let mut index = HashMap::with_capacity(categories.len());
    for category in categories {
        index
            .entry(category.id.as_str())
            .or_insert(category.parent_id.as_deref());
    }
    index
}
