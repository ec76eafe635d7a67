//! Common test utilities for catalog-core
//!
//! Shared datasets plus repository doubles that fail or stall on demand.

#![allow(dead_code)]

mod fixtures;
mod repositories;

pub use fixtures::*;
pub use repositories::*;
