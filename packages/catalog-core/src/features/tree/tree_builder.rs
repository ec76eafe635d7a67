//! Tree Builder - flat categories → ordered forest
//!
//! # Algorithm
//! 1. Index categories by id (ascending id order, first duplicate wins)
//! 2. Resolve each `parent_id`; a dangling reference makes the category a root
//! 3. Break cycles: walk each category's effective parent chain; if the walk
//!    returns to the category, cut its edge and promote it to root. Cuts are
//!    visible to later walks, so each cycle loses exactly one edge.
//! 4. Attach children, then sort every sibling list by name (see `collation`)
//!
//! Data-integrity problems degrade to "promoted to root" so that no category
//! disappears from the view. They are logged and reported in [`ForestReport`].

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

use super::collation::compare_names;
use super::node::CategoryNode;
use crate::features::catalog::domain::{Category, CategoryId};

/// Integrity findings collected while building a forest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForestReport {
    /// Categories whose parent id does not resolve
    pub promoted_dangling: Vec<CategoryId>,
    /// Categories promoted to break a parent cycle (one per cycle)
    pub promoted_cyclic: Vec<CategoryId>,
    /// Ids that appeared more than once in the input (later copies ignored)
    pub duplicate_ids: Vec<CategoryId>,
}

impl ForestReport {
    pub fn is_clean(&self) -> bool {
        self.promoted_dangling.is_empty()
            && self.promoted_cyclic.is_empty()
            && self.duplicate_ids.is_empty()
    }
}

/// Build the ordered forest
pub fn build_forest(categories: &[Category]) -> Vec<CategoryNode> {
    build_forest_with_report(categories).0
}

/// Build the ordered forest and report what had to be repaired
pub fn build_forest_with_report(categories: &[Category]) -> (Vec<CategoryNode>, ForestReport) {
    let mut report = ForestReport::default();

    // Step 1: index
    let mut by_id: BTreeMap<&str, &Category> = BTreeMap::new();
    for category in categories {
        if by_id.contains_key(category.id.as_str()) {
            warn!(id = %category.id, "duplicate category id, keeping first occurrence");
            report.duplicate_ids.push(category.id.clone());
            continue;
        }
        by_id.insert(category.id.as_str(), category);
    }

    // Step 2: resolve parents
    let mut effective: HashMap<&str, Option<&str>> = HashMap::with_capacity(by_id.len());
    for (&id, category) in &by_id {
        let parent = match category.parent_id.as_deref() {
            Some(parent) if by_id.contains_key(parent) => Some(parent),
            Some(parent) => {
                debug!(id, parent, reason = "dangling_parent", "promoting category to root");
                report.promoted_dangling.push(id.to_string());
                None
            }
            None => None,
        };
        effective.insert(id, parent);
    }

    // Step 3: break cycles (ascending id order keeps the choice deterministic)
    let mut settled: HashSet<&str> = HashSet::with_capacity(by_id.len());
    for &id in by_id.keys() {
        if let Some(parent) = effective.get(id).copied().flatten() {
            if chain_reaches(&effective, &mut settled, parent, id) {
                debug!(id, parent, reason = "cycle", "promoting category to root");
                report.promoted_cyclic.push(id.to_string());
                effective.insert(id, None);
            }
        }
    }

    // Step 4: attach
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut roots: Vec<&str> = Vec::new();
    for &id in by_id.keys() {
        match effective.get(id).copied().flatten() {
            Some(parent) => children.entry(parent).or_default().push(id),
            None => roots.push(id),
        }
    }

    let mut forest = assemble(&roots, &by_id, &children);
    sort_siblings(&mut forest);

    debug!(
        categories = by_id.len(),
        roots = forest.len(),
        "category forest built"
    );

    (forest, report)
}

/// Walk up from `start`; true if the walk reaches `origin`
///
/// `settled` holds categories whose chain is known to end at a root. Cuts only
/// remove edges, so a settled category stays settled and later walks stop
/// there instead of re-walking a long chain.
fn chain_reaches<'a>(
    effective: &HashMap<&'a str, Option<&'a str>>,
    settled: &mut HashSet<&'a str>,
    start: &'a str,
    origin: &'a str,
) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = Some(start);
    let reached = loop {
        match current {
            None => break false,
            Some(node) if node == origin => break true,
            Some(node) if settled.contains(node) => break false,
            Some(node) => {
                // a loop that does not pass through `origin`; broken when its own members are visited
                if !visited.insert(node) {
                    return false;
                }
                current = effective.get(node).copied().flatten();
            }
        }
    };

    // either the chain ends at a root or `origin` is about to become one
    settled.extend(visited);
    settled.insert(origin);
    reached
}

// Builds nodes bottom-up: a reversed pre-order lists every descendant
// before its ancestor, so each node's children are finished when it is built.
fn assemble(
    roots: &[&str],
    by_id: &BTreeMap<&str, &Category>,
    children: &HashMap<&str, Vec<&str>>,
) -> Vec<CategoryNode> {
    let mut order: Vec<&str> = Vec::with_capacity(by_id.len());
    let mut stack: Vec<&str> = roots.to_vec();
    while let Some(id) = stack.pop() {
        order.push(id);
        if let Some(child_ids) = children.get(id) {
            stack.extend(child_ids.iter().copied());
        }
    }

    let mut built: HashMap<&str, CategoryNode> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        // ids are drawn from by_id, so the lookup always hits
        let category = by_id
            .get(id)
            .map(|c| (*c).clone())
            .unwrap_or_else(|| Category::new(id, ""));
        let mut node = CategoryNode::new(category);

        if let Some(child_ids) = children.get(id) {
            node.children = child_ids
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            sort_siblings(&mut node.children);
        }
        built.insert(id, node);
    }

    roots.iter().filter_map(|root| built.remove(root)).collect()
}

/// Name order, then id for identical names
pub fn sort_siblings(nodes: &mut [CategoryNode]) {
    nodes.sort_by(|a, b| compare_names(a.name(), b.name()).then_with(|| a.id().cmp(b.id())));
}
