//! Tree Builder
//!
//! Derives the ordered category forest from a flat list. The forest is a
//! read-only view: it is rebuilt from a snapshot and never mutated in place.

pub mod ancestry;
pub mod collation;
pub mod node;
pub mod tree_builder;

pub use ancestry::{ancestors, would_create_cycle};
pub use collation::compare_names;
pub use node::{find_node, forest_iter, forest_size, CategoryNode, PreOrder};
pub use tree_builder::{build_forest, build_forest_with_report, sort_siblings, ForestReport};
