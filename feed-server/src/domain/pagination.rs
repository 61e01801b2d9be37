//! Page bounds and the paginated envelope returned by every listing.
//!
//! Raw page inputs never fail: missing or out-of-range values are clamped
//! into a valid [`PageRequest`]. Pages past the end are a valid terminal
//! state and produce an empty item list.

use serde::Serialize;

/// Default and maximum page sizes for one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u64,
    pub max_size: u64,
}

impl PageLimits {
    pub const POSTS: PageLimits = PageLimits {
        default_size: 8,
        max_size: 100,
    };

    pub const USERS: PageLimits = PageLimits {
        default_size: 10,
        max_size: 50,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    pub fn normalize(raw_page: Option<i64>, raw_page_size: Option<i64>, limits: PageLimits) -> Self {
        let page = raw_page.unwrap_or(1).max(1) as u64;
        let page_size = raw_page_size
            .map(|size| size.clamp(1, limits.max_size as i64) as u64)
            .unwrap_or(limits.default_size);

        Self { page, page_size }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationState {
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.page_size);

        Self {
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages,
            has_next_page: request.page < total_pages,
            has_previous_page: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationState,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            pagination: PaginationState::new(request, total_items),
        }
    }

    /// "No search performed": nothing was asked of the store.
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }
}
