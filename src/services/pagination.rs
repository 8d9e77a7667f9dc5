//! 1-indexed page windows with clamping.
//!
//! A request past the last page gets the last page. An empty result is a
//! single empty page.

use serde::Serialize;

use crate::domain::catalog::PageRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub total_items: u64,
}

impl PageWindow {
    /// # Panics
    ///
    /// Debug builds panic on a zero page size (config validation rejects it).
    #[must_use]
    pub fn new(total_items: u64, page_size: u64, request: PageRequest) -> Self {
        debug_assert!(page_size > 0, "page_size must be positive");
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);

        let number = match request {
            PageRequest::Number(n) => n.clamp(1, total_pages),
            PageRequest::Last => total_pages,
        };

        Self {
            number,
            total_pages,
            page_size,
            total_items,
        }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.number - 1) * self.page_size
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn from_window(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            number: window.number,
            total_pages: window.total_pages,
            total_items: window.total_items,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }
}

/// Slices an in-memory sequence.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page_size: u64, request: PageRequest) -> Page<T> {
    let window = PageWindow::new(items.len() as u64, page_size, request);
    let items = items
        .into_iter()
        .skip(usize::try_from(window.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(window.page_size).unwrap_or(usize::MAX))
        .collect();

    Page::from_window(items, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_first_page() {
        let page = paginate(items(35), 30, PageRequest::Number(1));
        assert_eq!(page.items.len(), 30);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_out_of_range_clamps_to_last_page() {
        let last = paginate(items(35), 30, PageRequest::Number(2));
        let beyond = paginate(items(35), 30, PageRequest::Number(5));

        assert_eq!(beyond.number, 2);
        assert_eq!(beyond.items, last.items);
        assert_eq!(beyond.items, vec![31, 32, 33, 34, 35]);
        assert!(!beyond.has_next);
        assert!(beyond.has_previous);
    }

    #[test]
    fn test_last_keyword() {
        let page = paginate(items(61), 30, PageRequest::Last);
        assert_eq!(page.number, 3);
        assert_eq!(page.items, vec![61]);
    }

    #[test]
    fn test_empty_sequence_is_one_empty_page() {
        let page = paginate(Vec::<u32>::new(), 30, PageRequest::Number(4));
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_exact_multiple() {
        let window = PageWindow::new(60, 30, PageRequest::Number(3));
        assert_eq!(window.total_pages, 2);
        assert_eq!(window.number, 2);
        assert_eq!(window.offset(), 30);
    }
}
