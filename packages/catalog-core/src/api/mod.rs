//! Caller-facing API

pub mod catalog_service;

pub use catalog_service::CatalogService;
