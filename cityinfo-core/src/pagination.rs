//! Page sizing and the metadata describing a windowed result set.

use std::num::NonZeroU32;

use serde::Serialize;

/// Upper bound applied to every requested page size.
pub const MAX_PAGE_SIZE: u32 = 20;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// First page number; page numbers are 1-based.
pub const FIRST_PAGE: i64 = 1;

/// A page size already clamped into `1..=MAX_PAGE_SIZE`.
///
/// # Examples
/// ```
/// use cityinfo_core::PageSize;
///
/// assert_eq!(PageSize::clamped(100).get(), 20);
/// assert_eq!(PageSize::clamped(0).get(), 1);
/// assert_eq!(PageSize::clamped(5).get(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Clamp an arbitrary request into the supported range.
    #[must_use]
    pub fn clamped(requested: u32) -> Self {
        let bounded = requested.clamp(1, MAX_PAGE_SIZE);
        Self(NonZeroU32::new(bounded).unwrap_or(NonZeroU32::MIN))
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::clamped(DEFAULT_PAGE_SIZE)
    }
}

/// The page a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page number. Values below 1 select nothing.
    pub page_number: i64,
    /// Clamped page size.
    pub page_size: PageSize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: FIRST_PAGE,
            page_size: PageSize::default(),
        }
    }
}

impl PageRequest {
    /// Build a request from a page number and clamped size.
    #[must_use]
    pub const fn new(page_number: i64, page_size: PageSize) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Rows to skip and take, or `None` when no row can be on this page.
    #[must_use]
    pub fn window(&self) -> Option<PageWindow> {
        let preceding = u64::try_from(self.page_number.checked_sub(1)?).ok()?;
        let limit = self.page_size.get();
        let offset = preceding.checked_mul(u64::from(limit))?;
        Some(PageWindow { offset, limit })
    }
}

/// Offset/limit pair handed to the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    /// Rows skipped before the page starts.
    pub offset: u64,
    /// Maximum rows returned.
    pub limit: u32,
}

/// Counters describing a windowed result set.
///
/// Serialises to the shape sent in the `X-Pagination` response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    /// Rows matching the filters before paging.
    pub total_item_count: u64,
    /// `ceil(total_item_count / page_size)`.
    pub total_page_count: u64,
    /// Rows per page.
    pub page_size: u32,
    /// Requested page number, echoed verbatim.
    pub current_page: i64,
}

impl PaginationMetadata {
    /// Derive page metadata using integer arithmetic only.
    ///
    /// # Examples
    /// ```
    /// use cityinfo_core::{PageSize, PaginationMetadata};
    ///
    /// let meta = PaginationMetadata::compute(21, 1, PageSize::clamped(10));
    /// assert_eq!(meta.total_page_count, 3);
    /// let empty = PaginationMetadata::compute(0, 1, PageSize::clamped(10));
    /// assert_eq!(empty.total_page_count, 0);
    /// ```
    #[must_use]
    pub const fn compute(total_count: u64, page_number: i64, page_size: PageSize) -> Self {
        let size = page_size.get();
        Self {
            total_item_count: total_count,
            total_page_count: total_count.div_ceil(size as u64),
            page_size: size,
            current_page: page_number,
        }
    }
}

/// One page of results with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Counters for the whole filtered set.
    pub metadata: PaginationMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(3, 1, 3)]
    fn computes_page_count(#[case] total: u64, #[case] size: u32, #[case] pages: u64) {
        let meta = PaginationMetadata::compute(total, 1, PageSize::clamped(size));
        assert_eq!(meta.total_page_count, pages);
        assert_eq!(meta.total_item_count, total);
    }

    #[rstest]
    #[case(1, Some(0))]
    #[case(2, Some(10))]
    #[case(0, None)]
    #[case(-3, None)]
    #[case(i64::MIN, None)]
    fn windows_follow_page_number(#[case] page_number: i64, #[case] offset: Option<u64>) {
        let request = PageRequest::new(page_number, PageSize::clamped(10));
        assert_eq!(request.window().map(|w| w.offset), offset);
    }

    #[rstest]
    fn huge_page_numbers_select_nothing() {
        let request = PageRequest::new(i64::MAX, PageSize::clamped(MAX_PAGE_SIZE));
        assert_eq!(request.window(), None);
        let last_fitting = PageRequest::new(i64::MAX, PageSize::clamped(1));
        assert_eq!(last_fitting.window().map(|w| w.limit), Some(1));
    }

    #[rstest]
    fn metadata_serialises_in_header_shape() {
        let meta = PaginationMetadata::compute(1, 1, PageSize::clamped(10));
        let json = serde_json::to_value(meta).expect("serialise metadata");
        assert_eq!(
            json,
            serde_json::json!({
                "totalItemCount": 1,
                "totalPageCount": 1,
                "pageSize": 10,
                "currentPage": 1,
            })
        );
    }

    proptest! {
        #[test]
        fn page_count_is_ceiling_division(total in 0_u64..1_000_000, size in 1_u32..=MAX_PAGE_SIZE, page in any::<i64>()) {
            let meta = PaginationMetadata::compute(total, page, PageSize::clamped(size));
            let width = u64::from(size);
            prop_assert!(meta.total_page_count * width >= total);
            prop_assert!(meta.total_page_count == 0 || (meta.total_page_count - 1) * width < total);
            prop_assert_eq!(meta.current_page, page);
        }

        #[test]
        fn clamped_sizes_stay_in_range(requested in any::<u32>()) {
            let size = PageSize::clamped(requested).get();
            prop_assert!((1..=MAX_PAGE_SIZE).contains(&size));
        }
    }
}
