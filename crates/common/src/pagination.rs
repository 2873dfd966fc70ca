//! Pagination normalization and page metadata.
//!
//! Raw `page`/`page_size` request parameters are normalized here, before
//! they reach any repository; the rest of the system only ever sees a
//! [`PageQuery`] with sane bounds.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Hard cap on the page size a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A normalized paging request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageQuery {
    /// Build a normalized query from raw request parameters.
    #[must_use]
    pub fn new(page: Option<u64>, page_size: Option<u64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let page_size = page_size
            .filter(|s| *s >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        Self { page, page_size }
    }

    /// Number of items to skip for this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    /// Page size as a query limit.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size
    }
}

/// Page metadata returned to clients alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number served.
    pub page: u64,
    /// Page size served.
    pub page_size: u64,
    /// Total items matching the query.
    pub total_items: u64,
    /// Total pages at this page size.
    pub total_pages: u64,
}

impl PageInfo {
    /// Compute page metadata for the given request and total count.
    #[must_use]
    pub const fn new(query: PageQuery, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(query.page_size);

        Self {
            page: query.page,
            page_size: query.page_size,
            total_items,
            total_pages,
        }
    }
}

/// A page of items plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Page metadata.
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    /// Bundle a page of items with computed metadata.
    #[must_use]
    pub const fn new(data: Vec<T>, query: PageQuery, total_items: u64) -> Self {
        Self {
            data,
            pagination: PageInfo::new(query, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let q = PageQuery::new(None, None);
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_zero_values_normalized() {
        let q = PageQuery::new(Some(0), Some(0));
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_size_capped() {
        let q = PageQuery::new(Some(3), Some(5000));
        assert_eq!(q.page_size, MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 2 * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_info_rounds_up() {
        let q = PageQuery::new(Some(1), Some(20));
        let info = PageInfo::new(q, 41);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.total_items, 41);
    }

    #[test]
    fn test_page_info_empty_total() {
        let info = PageInfo::new(PageQuery::default(), 0);
        assert_eq!(info.total_pages, 0);
    }
}
