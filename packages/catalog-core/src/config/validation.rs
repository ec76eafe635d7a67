//! Configuration validation
//!
//! Every config section implements [`Validatable`]. `CatalogConfig::validate`
//! runs the sections and then the cross-field checks.

use super::catalog_config::{CatalogConfig, PaginationConfig};
use super::error::{ConfigError, ConfigResult};
use crate::features::mutation::DeletePolicy;

/// Upper bound accepted for `pagination.max_per_page`
pub const MAX_PER_PAGE_LIMIT: usize = 10_000;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use catalog_core::config::Validatable;
///
/// fn load<C: Validatable>(config: C) -> ConfigResult<C> {
///     config.validate()?;
///     Ok(config)
/// }
/// ```
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

impl Validatable for PaginationConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_per_page == 0 || self.max_per_page > MAX_PER_PAGE_LIMIT {
            return Err(ConfigError::range_with_hint(
                "pagination.max_per_page",
                self.max_per_page,
                1,
                MAX_PER_PAGE_LIMIT,
                "Page size ceiling must be positive and bounded",
            ));
        }
        if self.default_per_page == 0 || self.default_per_page > self.max_per_page {
            return Err(ConfigError::range_with_hint(
                "pagination.default_per_page",
                self.default_per_page,
                1,
                self.max_per_page,
                "Default page size must fit under max_per_page",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "PaginationConfig"
    }
}

impl Validatable for CatalogConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.pagination.validate()?;

        if let Some(id) = &self.uncategorized_category_id {
            if id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "uncategorized_category_id must not be blank".to_string(),
                ));
            }
        }

        // Reparenting products of a root category needs somewhere to put them.
        if self.delete_policy == DeletePolicy::Reparent && self.uncategorized_category_id.is_none()
        {
            tracing::debug!(
                "delete_policy=reparent without uncategorized_category_id: deleting a root category that owns products will be rejected"
            );
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "CatalogConfig"
    }
}
