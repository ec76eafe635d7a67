//! Catalog configuration
//!
//! ```rust,ignore
//! use catalog_core::config::CatalogConfig;
//!
//! let config = CatalogConfig::from_yaml("catalog.yaml")?.apply_env_overrides()?;
//! ```

pub mod catalog_config;
pub mod error;
pub mod io;
pub mod validation;

// Re-exports
pub use catalog_config::{CatalogConfig, PaginationConfig, DEFAULT_MAX_PER_PAGE, DEFAULT_PER_PAGE};
pub use error::{ConfigError, ConfigResult};
pub use io::CatalogConfigFileV1;
pub use validation::Validatable;
