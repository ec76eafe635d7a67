//! Feature modules
//!
//! Data flow: repository → `catalog` (flat store) → `tree` → `aggregate`,
//! with `pagination` over the product collection and `mutation` as the
//! only write path.

pub mod aggregate;
pub mod catalog;
pub mod mutation;
pub mod pagination;
pub mod tree;
