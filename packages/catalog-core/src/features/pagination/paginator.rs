//! Paginator - page cursor a caller keeps between queries
//!
//! The cursor stores only `(current_page, per_page)`. Totals are always taken
//! from the collection handed to [`Paginator::current`], so they cannot go
//! stale after a mutation.

use tracing::debug;

use super::page::{paginate, total_pages, Page, PageRequest};
use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    per_page: usize,
    max_per_page: usize,
}

impl Paginator {
    pub fn new(per_page: usize, max_per_page: usize) -> Result<Self> {
        PageRequest::first(per_page).validate_within(max_per_page)?;
        Ok(Self {
            current_page: 1,
            per_page,
            max_per_page,
        })
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.current_page, self.per_page)
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 {
            return Err(CatalogError::validation("page must be >= 1"));
        }
        self.current_page = page;
        Ok(())
    }

    /// Change the page size and go back to page 1
    pub fn set_per_page(&mut self, per_page: usize) -> Result<()> {
        PageRequest::first(per_page).validate_within(self.max_per_page)?;
        if per_page != self.per_page {
            debug!(from = self.per_page, to = per_page, "per_page changed, resetting to page 1");
        }
        self.per_page = per_page;
        self.current_page = 1;
        Ok(())
    }

    /// Advance unless already on the last page of `total_items`
    pub fn next_page(&mut self, total_items: usize) -> bool {
        if self.current_page < total_pages(total_items, self.per_page) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Pull the cursor back after the collection shrank
    ///
    /// Returns `true` when the page moved. An empty collection parks the
    /// cursor on page 1.
    pub fn reconcile(&mut self, total_items: usize) -> bool {
        let last = total_pages(total_items, self.per_page).max(1);
        if self.current_page > last {
            debug!(from = self.current_page, to = last, total_items, "page cursor reconciled");
            self.current_page = last;
            true
        } else {
            false
        }
    }

    pub fn current<T: Clone>(&self, items: &[T]) -> Result<Page<T>> {
        paginate(items, self.request())
    }
}
