//! Catalog configuration model
//!
//! Layering (later wins): `Default` → YAML file → environment overrides.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::io::{CatalogConfigFileV1, SUPPORTED_VERSIONS};
use super::validation::Validatable;
use crate::features::catalog::domain::CategoryId;
use crate::features::mutation::DeletePolicy;

/// Default number of products per page
pub const DEFAULT_PER_PAGE: usize = 10;

/// Default ceiling for a requested page size
pub const DEFAULT_MAX_PER_PAGE: usize = 100;

/// Environment variable names
pub const ENV_DELETE_POLICY: &str = "CATALOG_DELETE_POLICY";
pub const ENV_DEFAULT_PER_PAGE: &str = "CATALOG_DEFAULT_PER_PAGE";
pub const ENV_MAX_PER_PAGE: &str = "CATALOG_MAX_PER_PAGE";
pub const ENV_UNCATEGORIZED_ID: &str = "CATALOG_UNCATEGORIZED_ID";

/// Pagination settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page size used when the caller does not pick one
    pub default_per_page: usize,
    /// Largest page size a caller may request
    pub max_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: DEFAULT_MAX_PER_PAGE,
        }
    }
}

/// Top-level catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub pagination: PaginationConfig,
    /// What happens to descendants and products when a category is deleted
    pub delete_policy: DeletePolicy,
    /// Destination for products of a deleted root category under `Reparent`
    pub uncategorized_category_id: Option<CategoryId>,
}

impl CatalogConfig {
    /// Load configuration from a YAML file (schema v1)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string (schema v1)
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: CatalogConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();
        if let Some(pagination) = file.pagination {
            config.pagination = pagination;
        }
        if let Some(policy) = file.delete_policy {
            config.delete_policy = policy;
        }
        if file.uncategorized_category_id.is_some() {
            config.uncategorized_category_id = file.uncategorized_category_id;
        }

        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML (schema v1)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = CatalogConfigFileV1 {
            version: Some(1),
            pagination: Some(self.pagination),
            delete_policy: Some(self.delete_policy),
            uncategorized_category_id: self.uncategorized_category_id.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Apply `CATALOG_*` environment overrides
    pub fn apply_env_overrides(self) -> ConfigResult<Self> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (environment, test map, ...)
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_DELETE_POLICY) {
            self.delete_policy = DeletePolicy::from_str(raw.trim())?;
        }
        if let Some(raw) = lookup(ENV_DEFAULT_PER_PAGE) {
            self.pagination.default_per_page = parse_usize(ENV_DEFAULT_PER_PAGE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_PER_PAGE) {
            self.pagination.max_per_page = parse_usize(ENV_MAX_PER_PAGE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_UNCATEGORIZED_ID) {
            let raw = raw.trim();
            self.uncategorized_category_id = (!raw.is_empty()).then(|| raw.to_string());
        }

        self.validate()?;
        Ok(self)
    }
}

fn parse_usize(key: &str, raw: &str) -> ConfigResult<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::Validation(format!("{key} must be a non-negative integer, got '{raw}'")))
}
