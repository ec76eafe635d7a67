//! CategoryNode - derived tree view over flat categories
//!
//! Nodes are rebuilt from a snapshot on every read and never patched.

use serde::Serialize;

use crate::features::catalog::domain::{Category, CategoryId};

/// A category together with its ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.category.id
    }

    pub fn name(&self) -> &str {
        &self.category.name
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Count total nodes in this subtree (including self)
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Height of the subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Pre-order traversal (self first, children in sibling order)
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Ids of every node below this one, pre-order
    pub fn descendant_ids(&self) -> Vec<CategoryId> {
        self.iter().skip(1).map(|n| n.category.id.clone()).collect()
    }

    /// Depth-first search within this subtree
    pub fn find(&self, id: &str) -> Option<&CategoryNode> {
        self.iter().find(|n| n.id() == id)
    }
}

// Unlinks children onto a heap stack so dropping a deep chain never recurses.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order iterator over a subtree
pub struct PreOrder<'a> {
    stack: Vec<&'a CategoryNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a CategoryNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Depth-first search across a forest; first match wins
pub fn find_node<'a>(forest: &'a [CategoryNode], id: &str) -> Option<&'a CategoryNode> {
    forest.iter().find_map(|root| root.find(id))
}

/// Total number of nodes in a forest
pub fn forest_size(forest: &[CategoryNode]) -> usize {
    forest.iter().map(CategoryNode::node_count).sum()
}

/// Pre-order traversal of every tree in a forest
pub fn forest_iter(forest: &[CategoryNode]) -> impl Iterator<Item = &CategoryNode> {
    forest.iter().flat_map(CategoryNode::iter)
}
