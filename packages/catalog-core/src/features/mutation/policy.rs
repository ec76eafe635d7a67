//! Category delete policy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// What deleting a category does to its descendants and products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Delete the whole subtree and every product in it
    #[default]
    Cascade,
    /// Move children and direct products up to the deleted category's parent
    Reparent,
    /// Refuse while the category has children or products
    Reject,
}

impl DeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePolicy::Cascade => "cascade",
            DeletePolicy::Reparent => "reparent",
            DeletePolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cascade" => Ok(DeletePolicy::Cascade),
            "reparent" => Ok(DeletePolicy::Reparent),
            "reject" => Ok(DeletePolicy::Reject),
            _ => Err(ConfigError::UnknownDeletePolicy(s.to_string())),
        }
    }
}
