//! Fixed-size page-number pagination primitives.
//!
//! Listing endpoints share one pagination contract: pages are requested by a
//! 1-based page number, every page has the same fixed size, and responses
//! carry a [`Page`] envelope with enough totals for clients to render pager
//! controls. Requesting a page past the end is not an error; it yields an
//! empty page with accurate totals.

use serde::{Deserialize, Serialize};

/// Errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are 1-based; zero is not addressable.
    #[error("page numbers start at 1")]
    ZeroPageNumber,
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// A validated request for one fixed-size page.
///
/// ## Invariants
/// - `number` is 1-based and never zero.
/// - `size` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Build a request for page `number` with `size` items per page.
    pub fn new(number: u32, size: u32) -> Result<Self, PageRequestError> {
        if number == 0 {
            return Err(PageRequestError::ZeroPageNumber);
        }
        if size == 0 {
            return Err(PageRequestError::ZeroPageSize);
        }
        Ok(Self { number, size })
    }

    /// The first page for the given page size.
    pub fn first(size: u32) -> Result<Self, PageRequestError> {
        Self::new(1, size)
    }

    /// 1-based page number.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Items per page.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of items to skip when executing an offset query.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    /// Number of items to fetch when executing a limit query.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// One page of results plus the totals needed to navigate the full set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, at most `size` of them.
    pub items: Vec<T>,
    /// 1-based number of this page.
    pub number: u32,
    /// Fixed page size the listing was requested with.
    pub size: u32,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages; zero items still counts as one empty page.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page envelope from query results and the overall total.
    ///
    /// `items` must already be truncated to the page size by the caller's
    /// query; this constructor only derives the navigation totals.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let size = u64::from(request.size());
        let total_pages = total_items.div_ceil(size).max(1);
        Self {
            items,
            number: request.number(),
            size: request.size(),
            total_items,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    /// An empty page for requests past the end of the listing.
    #[must_use]
    pub fn empty(request: PageRequest, total_items: u64) -> Self {
        Self::new(Vec::new(), request, total_items)
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Map the item type while keeping the envelope intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
