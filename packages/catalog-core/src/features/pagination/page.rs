//! Page envelope and slicing

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

///
/// PageRequest
/// 1-based page index plus page size, instead of raw integers passed around
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// First page of the given size
    pub fn first(per_page: usize) -> Self {
        Self::new(1, per_page)
    }

    /// Reject (never clamp) out-of-domain requests
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(CatalogError::validation("page must be >= 1"));
        }
        if self.per_page == 0 {
            return Err(CatalogError::validation("perPage must be >= 1"));
        }
        Ok(())
    }

    /// `validate` plus an upper bound on the page size
    pub fn validate_within(&self, max_per_page: usize) -> Result<()> {
        self.validate()?;
        if self.per_page > max_per_page {
            return Err(CatalogError::validation(format!(
                "perPage {} exceeds the maximum of {}",
                self.per_page, max_per_page
            )));
        }
        Ok(())
    }

    /// Index of the first item on this page (saturating)
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

///
/// Page
/// Contiguous slice of an ordered collection plus its bookkeeping
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1 && self.total_pages > 0
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Number of pages needed for `total_items` (0 for an empty collection)
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(per_page)
}

/// Slice `items` into the requested page
///
/// A page past the end yields no items but keeps the requested
/// `current_page` and the true totals.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Result<Page<T>> {
    request.validate()?;

    let total_items = items.len();
    let start = request.offset().min(total_items);
    let end = start.saturating_add(request.per_page).min(total_items);

    Ok(Page {
        items: items[start..end].to_vec(),
        current_page: request.page,
        per_page: request.per_page,
        total_items,
        total_pages: total_pages(total_items, request.per_page),
    })
}
