//! Catalog domain models
//!
//! - `Category`: node of the category hierarchy (parent by id)
//! - `Product`: flat record owned by exactly one category
//! - `CategoryInput` / `ProductInput`: write payloads (the repository assigns ids)
//! - `CatalogSnapshot`: point-in-time copy of both collections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Category identifier
pub type CategoryId = String;

/// Product identifier
pub type ProductId = String;

/// Category record
///
/// `parent_id == None` marks a root. A `parent_id` that does not resolve is
/// tolerated on read (the tree builder promotes such categories to roots).
///
/// # Examples
///
/// ```rust
/// use catalog_core::features::catalog::domain::Category;
///
/// let laptops = Category::new("2", "Laptops").with_parent("1");
/// assert_eq!(laptops.parent_id.as_deref(), Some("1"));
/// assert!(!laptops.is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl Category {
    /// Create a root category
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    /// Set the parent (builder pattern)
    pub fn with_parent(mut self, parent_id: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Build a record from a write payload and a repository-assigned id
    pub fn from_input(id: impl Into<CategoryId>, input: &CategoryInput) -> Self {
        Self {
            id: id.into(),
            name: input.name.clone(),
            parent_id: input.parent_id.clone(),
        }
    }
}

/// Product record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: CategoryId,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Create a product with zero stock and no description/image
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: f64,
        category_id: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: None,
            category_id: category_id.into(),
            stock: 0,
            image: None,
        }
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build a record from a write payload and a repository-assigned id
    pub fn from_input(id: impl Into<ProductId>, input: &ProductInput) -> Self {
        Self {
            id: id.into(),
            name: input.name.clone(),
            price: input.price,
            description: input.description.clone(),
            category_id: input.category_id.clone(),
            stock: input.stock,
            image: input.image.clone(),
        }
    }

    /// Payload that would recreate this record (used when moving products)
    pub fn to_input(&self) -> ProductInput {
        ProductInput {
            name: self.name.clone(),
            price: self.price,
            description: self.description.clone(),
            category_id: self.category_id.clone(),
            stock: self.stock,
            image: self.image.clone(),
        }
    }
}

/// Category write payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Shape checks only; reference and cycle checks need the store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("category name must not be empty"));
        }
        if matches!(&self.parent_id, Some(p) if p.trim().is_empty()) {
            return Err(CatalogError::validation("parent id must not be blank"));
        }
        Ok(())
    }
}

/// Product write payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: CategoryId,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, price: f64, category_id: impl Into<CategoryId>) -> Self {
        Self {
            name: name.into(),
            price,
            description: None,
            category_id: category_id.into(),
            stock: 0,
            image: None,
        }
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Shape checks only; the category reference is checked against the store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("product name must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CatalogError::validation(format!(
                "product price must be a non-negative number, got {}",
                self.price
            )));
        }
        if self.category_id.trim().is_empty() {
            return Err(CatalogError::validation("product category id must not be blank"));
        }
        Ok(())
    }
}

/// Point-in-time copy of the flat store
///
/// Consumers may iterate it freely while writers keep committing; it never
/// observes a later mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    /// Store revision the snapshot was taken at
    pub version: u64,
    pub taken_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(categories: Vec<Category>, products: Vec<Product>, version: u64) -> Self {
        Self {
            categories,
            products,
            version,
            taken_at: Utc::now(),
        }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}
