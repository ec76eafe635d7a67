//! Configuration I/O (YAML schema types)
//!
//! Loading/saving methods live on `CatalogConfig` in catalog_config.rs.

use serde::{Deserialize, Serialize};

use super::catalog_config::PaginationConfig;
use crate::features::catalog::domain::CategoryId;
use crate::features::mutation::DeletePolicy;

/// Supported schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// pagination:
///   default_per_page: 10
///   max_per_page: 100
/// delete_policy: reparent
/// uncategorized_category_id: "0"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfigFileV1 {
    /// Schema version (always 1 for v1). Optional here so a missing field
    /// reports `MissingVersion` instead of a generic YAML error.
    #[serde(default)]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_policy: Option<DeletePolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncategorized_category_id: Option<CategoryId>,
}
