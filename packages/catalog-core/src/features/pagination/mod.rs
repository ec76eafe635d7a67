//! Pagination Engine
//!
//! Policy: out-of-domain requests (`page == 0`, `per_page == 0`,
//! `per_page > max`) are rejected with `ErrorKind::Validation`, never clamped.

pub mod page;
pub mod paginator;

pub use page::{paginate, total_pages, Page, PageRequest};
pub use paginator::Paginator;
