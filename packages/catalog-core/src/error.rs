//! Error types for catalog-core

use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;

/// Catalog error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input (empty name, negative price, zero page size)
    Validation,
    /// Referenced id is absent from the flat store
    NotFound,
    /// A parent assignment would make a category its own ancestor
    CyclicReference,
    /// Repository call failed (network/server fault)
    Transport,
    /// Configuration errors
    Config,
    /// Serialization/deserialization errors
    Serialization,
    /// I/O errors
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::CyclicReference => "cyclic_reference",
            ErrorKind::Transport => "transport",
            ErrorKind::Config => "config",
            ErrorKind::Serialization => "serialization",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct CatalogError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl CatalogError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn category_not_found(category_id: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("Category not found: {}", category_id.into()),
        )
    }

    pub fn product_not_found(product_id: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("Product not found: {}", product_id.into()),
        )
    }

    pub fn cyclic_reference(category_id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::CyclicReference,
            format!(
                "Setting parent of {} to {} would create a cycle",
                category_id.into(),
                parent_id.into()
            ),
        )
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Only transport faults may succeed when reissued. The core itself never retries.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::Transport
    }
}

// JSON error conversions
impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::new(ErrorKind::Serialization, format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::new(ErrorKind::IO, format!("I/O error: {}", err)).with_source(err)
    }
}

impl From<ConfigError> for CatalogError {
    fn from(err: ConfigError) -> Self {
        CatalogError::config(err.to_string()).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
