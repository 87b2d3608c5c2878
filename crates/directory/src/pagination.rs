//! Page/limit pagination for directory listings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 25;
pub const MAX_LIMIT: usize = 100;

/// 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: usize,
    pub limit: usize,
}

/// Neighbouring pages, present only when they contain records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Saturates for pages far past the end; such pages are simply empty.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Slice one page out of an already-sorted listing.
    pub fn apply<T>(&self, items: Vec<T>) -> (Vec<T>, PageLinks) {
        let total = items.len();
        let start = self.offset();
        let end = start.saturating_add(self.limit);

        let links = PageLinks {
            next: (end < total).then_some(PageLink {
                page: self.page.saturating_add(1),
                limit: self.limit,
            }),
            prev: (start > 0).then_some(PageLink {
                page: self.page.saturating_sub(1),
                limit: self.limit,
            }),
        };

        let page = items.into_iter().skip(start).take(self.limit).collect();
        (page, links)
    }
}
