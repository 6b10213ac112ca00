//! Vendor pages and client windowing.

use serde::{Deserialize, Serialize};

/// One vendor page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub page_number: usize,

    /// Records per page, never above the vendor maximum
    pub page_size: usize,
}

impl Page {
    pub fn new(page_number: usize, page_size: usize) -> Self {
        Self {
            page_number,
            page_size,
        }
    }
}

/// The vendor pages needed to cover a client window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Pages to fetch, in order; never empty
    pub pages: Vec<Page>,

    /// Offset into the concatenated page results where the window starts
    pub first_object_index: usize,

    /// Number of records the client asked for
    pub limit: usize,
}

impl PaginationInfo {
    /// The slice instructions handed to the caller
    pub fn windowing(&self) -> Windowing {
        Windowing {
            first_object_index: self.first_object_index,
            limit: self.limit,
        }
    }

    /// Total records the pages can hold
    pub fn capacity(&self) -> usize {
        self.pages.iter().map(|p| p.page_size).sum()
    }
}

/// Where the client window sits inside the concatenated vendor results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Windowing {
    pub first_object_index: usize,
    pub limit: usize,
}

impl Windowing {
    /// Cut the client window out of the concatenated results of all pages.
    ///
    /// Returns fewer than `limit` items when the vendor ran out of records.
    pub fn apply<T>(&self, concatenated: Vec<T>) -> Vec<T> {
        concatenated
            .into_iter()
            .skip(self.first_object_index)
            .take(self.limit)
            .collect()
    }
}
