//! Reconciliation of a client `(offset, limit)` window with vendor pages.
//!
//! The vendor serves fixed-size pages numbered from 1 and refuses page sizes
//! above [`VENDOR_MAX_PAGE_SIZE`]. A client window may start anywhere and
//! straddle page boundaries, so the window is covered by one or more
//! consecutive pages of `min(limit, max)` records and the caller slices the
//! concatenated results from `first_object_index`.
//!
//! ```
//! use holdings_query::query::reconcile;
//! use holdings_query::models::Page;
//!
//! let info = reconcile(31, 15);
//! assert_eq!(info.pages, vec![Page::new(3, 15), Page::new(4, 15)]);
//! assert_eq!(info.first_object_index, 1);
//! ```

use crate::models::{Page, PaginationInfo};

/// Largest page size the vendor accepts
pub const VENDOR_MAX_PAGE_SIZE: usize = 100;

/// Default ceiling on a client window, keeping the page list bounded
pub const DEFAULT_MAX_LIMIT: usize = 1_000;

/// Reconcile a window against the vendor's maximum page size
pub fn reconcile(offset: usize, limit: usize) -> PaginationInfo {
    reconcile_with_max(offset, limit, VENDOR_MAX_PAGE_SIZE)
}

/// Reconcile a window against a custom maximum page size.
///
/// The page list grows with `limit`, so callers bound the window first
/// ([`crate::Translator::paginate`] does). A zero page size is raised to 1
/// so the arithmetic never divides by zero.
pub fn reconcile_with_max(offset: usize, limit: usize, max_page_size: usize) -> PaginationInfo {
    let page_size = limit.min(max_page_size).max(1);
    let window_end = offset.saturating_add(limit);

    let mut page_number = offset / page_size + 1;
    let mut pages = vec![Page::new(page_number, page_size)];

    while window_end > page_number.saturating_mul(page_size) {
        page_number += 1;
        pages.push(Page::new(page_number, page_size));
    }

    let info = PaginationInfo {
        pages,
        first_object_index: offset % page_size,
        limit,
    };

    tracing::debug!(
        offset,
        limit,
        page_size,
        pages = info.pages.len(),
        first_object_index = info.first_object_index,
        "Reconciled client window with vendor pages"
    );

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_page() {
        let info = reconcile(0, 50);
        assert_eq!(info.pages, vec![Page::new(1, 50)]);
        assert_eq!(info.first_object_index, 0);
        assert_eq!(info.limit, 50);
    }

    #[test]
    fn test_boundary_straddle() {
        let info = reconcile(31, 15);
        assert_eq!(info.pages, vec![Page::new(3, 15), Page::new(4, 15)]);
        assert_eq!(info.first_object_index, 1);
    }

    #[test]
    fn test_exact_fit_has_no_extra_page() {
        let info = reconcile(900, 100);
        assert_eq!(info.pages, vec![Page::new(10, 100)]);
        assert_eq!(info.first_object_index, 0);
    }

    #[test]
    fn test_vendor_cap() {
        let info = reconcile(0, 143);
        assert_eq!(info.pages, vec![Page::new(1, 100), Page::new(2, 100)]);
        assert_eq!(info.first_object_index, 0);
        assert_eq!(info.limit, 143);
    }

    #[test]
    fn test_capped_window_straddling_three_pages() {
        let info = reconcile(150, 250);
        assert_eq!(
            info.pages,
            vec![Page::new(2, 100), Page::new(3, 100), Page::new(4, 100)]
        );
        assert_eq!(info.first_object_index, 50);
    }

    #[test]
    fn test_custom_max_page_size() {
        let info = reconcile_with_max(10, 25, 20);
        assert_eq!(info.pages, vec![Page::new(1, 20), Page::new(2, 20)]);
        assert_eq!(info.first_object_index, 10);
    }

    #[test]
    fn test_zero_limit_does_not_divide_by_zero() {
        let info = reconcile(7, 0);
        assert_eq!(info.pages.len(), 1);
        assert_eq!(info.limit, 0);
    }

    proptest! {
        #[test]
        fn pages_cover_requested_window(offset in 0usize..1_000_000, limit in 1usize..1_000) {
            let info = reconcile(offset, limit);
            prop_assert!(!info.pages.is_empty());
            prop_assert!(info.capacity() >= info.first_object_index + limit);
        }

        #[test]
        fn pages_are_consecutive_and_start_at_window(offset in 0usize..1_000_000, limit in 1usize..1_000) {
            let info = reconcile(offset, limit);
            let size = info.pages[0].page_size;
            prop_assert!(size <= VENDOR_MAX_PAGE_SIZE);
            prop_assert_eq!((info.pages[0].page_number - 1) * size + info.first_object_index, offset);
            for pair in info.pages.windows(2) {
                prop_assert_eq!(pair[1].page_number, pair[0].page_number + 1);
                prop_assert_eq!(pair[1].page_size, size);
            }
        }

        #[test]
        fn reconcile_is_idempotent(offset in 0usize..1_000_000, limit in 1usize..1_000) {
            prop_assert_eq!(reconcile(offset, limit), reconcile(offset, limit));
        }
    }
}
