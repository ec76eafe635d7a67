//! Aggregator
//!
//! Pure functions of a forest and a product slice. A category that is not in
//! the forest has no products, so lookups on unknown ids return zeros.

pub mod aggregator;

pub use aggregator::{
    aggregate_for, aggregate_forest, aggregate_node, recursive_price_sum,
    recursive_product_count, unresolved_products, CategoryAggregate,
};
