//! Pagination utilities for showtrack-dash
//!
//! Used by the public show list, which is rendered as a card grid.

/// Cards per page
pub const PAGE_SIZE: usize = 24;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Index of the first item on the page
    pub offset: usize,
}

impl Pagination {
    /// The items of `all` that fall on this page
    pub fn slice<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        let start = self.offset.min(all.len());
        let end = (self.offset + PAGE_SIZE).min(all.len());
        &all[start..end]
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// Out-of-range pages are clamped to [1, total_pages].
///
/// # Examples
/// ```
/// use showtrack_dash::pagination::calculate_pagination;
///
/// // 60 shows = 3 pages (24 + 24 + 12)
/// let p = calculate_pagination(60, 2);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 24);
///
/// let p = calculate_pagination(60, 99);
/// assert_eq!(p.page, 3);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: i64) -> Pagination {
    let total_pages = total_results.div_ceil(PAGE_SIZE);
    let requested = usize::try_from(requested_page.max(1)).unwrap_or(usize::MAX);
    let page = requested.min(total_pages.max(1));
    let offset = (page - 1) * PAGE_SIZE;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(60, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 24);
    }

    #[test]
    fn test_pagination_out_of_bounds() {
        assert_eq!(calculate_pagination(30, 99).page, 2);
        assert_eq!(calculate_pagination(30, 0).page, 1);
        assert_eq!(calculate_pagination(30, -5).page, 1);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
        assert!(p.slice::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_slice_last_page_is_partial() {
        let items: Vec<usize> = (0..30).collect();
        let p = calculate_pagination(items.len(), 2);
        assert_eq!(p.slice(&items), &items[24..30]);
    }

    #[test]
    fn test_exact_page_boundary() {
        let p = calculate_pagination(48, 2);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 24);
    }
}
