//! Numbered page windows for the moderation panels.
//!
//! A window is the list of page links (with ellipsis gaps) plus the slice of
//! the ordered collection that belongs to the current page. Callers clamp the
//! current page with [`clamp_page`] before computing a window.

use std::num::NonZeroUsize;
use std::ops::Range;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLabel {
    Page(usize),
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub slice: Range<usize>,
    pub labels: Vec<PageLabel>,
    pub total_pages: usize,
}

pub fn total_pages(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get())
}

/// Clamp a 1-based page number into `[1, max(total_pages, 1)]`.
pub fn clamp_page(current: usize, total_pages: usize) -> usize {
    current.clamp(1, total_pages.max(1))
}

impl PageWindow {
    /// Compute labels and the current slice for a 1-based `current` page.
    pub fn compute(total: usize, page_size: NonZeroUsize, current: usize) -> Self {
        if total == 0 {
            return Self {
                slice: 0..0,
                labels: Vec::new(),
                total_pages: 0,
            };
        }

        let size = page_size.get();
        let pages = total_pages(total, page_size);
        let mut labels = vec![PageLabel::Page(1)];

        if current > 3 {
            labels.push(PageLabel::Ellipsis);
        }

        let lower = current.saturating_sub(1).max(2);
        let upper = (current + 1).min(pages.saturating_sub(1));
        for page in lower..=upper {
            if page != 1 && page != pages {
                labels.push(PageLabel::Page(page));
            }
        }

        if current + 2 < pages {
            labels.push(PageLabel::Ellipsis);
        }

        if pages > 1 {
            labels.push(PageLabel::Page(pages));
        }

        let start = current.saturating_sub(1) * size;
        let end = (current * size).min(total);

        Self {
            slice: start..end,
            labels,
            total_pages: pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use PageLabel::{Ellipsis, Page};

    fn size(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero page size")
    }

    #[test]
    fn empty_collection_has_no_labels() {
        let window = PageWindow::compute(0, size(10), 1);
        assert!(window.is_empty());
        assert_eq!(window.slice, 0..0);
        assert_eq!(window.total_pages, 0);
    }

    #[test]
    fn three_pages_render_without_gaps() {
        let window = PageWindow::compute(25, size(10), 1);
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.labels, vec![Page(1), Page(2), Page(3)]);
        assert_eq!(window.slice, 0..10);
    }

    #[test]
    fn middle_page_has_ellipsis_on_both_sides() {
        let window = PageWindow::compute(100, size(10), 5);
        assert_eq!(
            window.labels,
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert_eq!(window.slice, 40..50);
    }

    #[test]
    fn last_page_slice_is_truncated() {
        let window = PageWindow::compute(25, size(10), 3);
        assert_eq!(window.slice, 20..25);
        assert_eq!(window.labels, vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn single_page_only_lists_page_one() {
        let window = PageWindow::compute(4, size(10), 1);
        assert_eq!(window.labels, vec![Page(1)]);
        assert_eq!(window.slice, 0..4);
    }

    #[test]
    fn page_four_gets_leading_ellipsis() {
        let window = PageWindow::compute(100, size(10), 4);
        assert_eq!(
            window.labels,
            vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn near_the_end_drops_trailing_ellipsis() {
        let window = PageWindow::compute(100, size(10), 8);
        assert_eq!(
            window.labels,
            vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn consecutive_ellipses_never_appear() {
        for total in 1..=120 {
            let pages = total_pages(total, size(7));
            for current in 1..=pages {
                let window = PageWindow::compute(total, size(7), current);
                let doubled = window
                    .labels
                    .windows(2)
                    .any(|pair| pair == [Ellipsis, Ellipsis]);
                assert!(!doubled, "total={total} current={current}");
            }
        }
    }

    #[test]
    fn clamp_page_keeps_page_in_range() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }
}
