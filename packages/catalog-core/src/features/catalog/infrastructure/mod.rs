//! Infrastructure layer - flat store and repository adapters

pub mod flat_store;
pub mod memory_repository;

pub use flat_store::{ChangeSet, FlatStore};
pub use memory_repository::InMemoryCatalogRepository;
