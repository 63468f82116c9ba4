//! Compact page-number navigation.

/// How many page links to show around the edges and the current page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub left_edge: usize,
    pub left_current: usize,
    pub right_current: usize,
    pub right_edge: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            left_edge: 2,
            left_current: 2,
            right_current: 4,
            right_edge: 2,
        }
    }
}

/// 1-based page numbers with `None` marking a gap.
fn get_pages(total_pages: usize, current_page: usize, window: PageWindow) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + window.left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(window.left_current));
    let mid_end = (current_page + window.right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(window.right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Zero-based page indices to render for `page_index` out of `page_count`.
pub fn page_links(page_count: usize, page_index: usize, window: PageWindow) -> Vec<Option<usize>> {
    let current = page_index.min(page_count.saturating_sub(1)) + 1;
    get_pages(page_count, current, window)
        .into_iter()
        .map(|page| page.map(|number| number - 1))
        .collect()
}
