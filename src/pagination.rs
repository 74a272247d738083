//! Splitting long tables into pages and the links for moving between them.

use maud::{Markup, html};

/// Page sizes and limits for paged tables.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page shown when a request does not ask for one.
    pub default_page: u64,
    /// The number of rows per page when a request does not say.
    pub default_page_size: u64,
    /// The most numbered page links to show at once.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_pages: 5,
        }
    }
}

/// One link (or gap) in the page navigation under a paged table.
#[derive(Debug, PartialEq, Eq)]
pub enum PageItem {
    /// Go to the previous page.
    Back(u64),
    /// A link to another page.
    Page(u64),
    /// The page being shown.
    Current(u64),
    /// Pages left out between two links.
    Gap,
    /// Go to the next page.
    Next(u64),
}

/// The navigation for `current_page` out of `page_count` pages.
///
/// At most `max_pages` consecutive pages are linked, centred on the current
/// page where possible. The first and last pages are always reachable and a
/// [PageItem::Gap] marks any pages skipped to get there.
pub fn page_items(current_page: u64, page_count: u64, max_pages: u64) -> Vec<PageItem> {
    let (first, last) = if page_count <= max_pages {
        (1, page_count)
    } else {
        let first = current_page
            .saturating_sub(max_pages / 2)
            .clamp(1, page_count - max_pages + 1);
        (first, first + max_pages - 1)
    };

    let mut items = Vec::new();

    if current_page > 1 {
        items.push(PageItem::Back(current_page - 1));
    }

    if first > 1 {
        items.push(PageItem::Page(1));
    }
    if first > 2 {
        items.push(PageItem::Gap);
    }

    items.extend((first..=last).map(|page| {
        if page == current_page {
            PageItem::Current(page)
        } else {
            PageItem::Page(page)
        }
    }));

    if last + 1 < page_count {
        items.push(PageItem::Gap);
    }
    if last < page_count {
        items.push(PageItem::Page(page_count));
    }

    if current_page < page_count {
        items.push(PageItem::Next(current_page + 1));
    }

    items
}

const PAGE_LINK_STYLE: &str = "flex items-center justify-center px-3 h-8 leading-tight \
    text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 hover:text-gray-700 \
    dark:bg-gray-800 dark:border-gray-700 dark:text-gray-400 dark:hover:bg-gray-700";

const CURRENT_PAGE_STYLE: &str = "flex items-center justify-center px-3 h-8 \
    text-blue-600 border border-gray-300 bg-blue-50 dark:border-gray-700 \
    dark:bg-gray-700 dark:text-white";

/// Render `items` as links to `page_url`, keeping the page size at `per_page`.
pub fn pagination_nav(items: &[PageItem], page_url: &str, per_page: u64) -> Markup {
    let href = |page: &u64| format!("{page_url}?page={page}&per_page={per_page}");

    html! {
        nav class="pagination flex justify-center mt-4" aria-label="Pages"
        {
            ul class="inline-flex -space-x-px text-sm"
            {
                @for item in items {
                    li {
                        @match item {
                            PageItem::Back(page) => {
                                a href=(href(page)) class=(PAGE_LINK_STYLE) { "Back" }
                            }
                            PageItem::Page(page) => {
                                a href=(href(page)) class=(PAGE_LINK_STYLE) { (page) }
                            }
                            PageItem::Current(page) => {
                                a href=(href(page)) aria-current="page" class=(CURRENT_PAGE_STYLE) { (page) }
                            }
                            PageItem::Gap => {
                                span class=(PAGE_LINK_STYLE) { "..." }
                            }
                            PageItem::Next(page) => {
                                a href=(href(page)) class=(PAGE_LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod page_items_tests {
    use super::{
        PageItem::{Back, Current, Gap, Next, Page},
        page_items,
    };

    #[test]
    fn few_pages_are_all_shown() {
        assert_eq!(
            page_items(1, 5, 5),
            [Current(1), Page(2), Page(3), Page(4), Page(5), Next(2)]
        );
        assert_eq!(page_items(2, 2, 5), [Back(1), Page(1), Current(2)]);
    }

    #[test]
    fn single_page_has_no_buttons() {
        assert_eq!(page_items(1, 1, 5), [Current(1)]);
    }

    #[test]
    fn no_pages() {
        assert!(page_items(1, 0, 5).is_empty());
    }

    #[test]
    fn start_of_many_pages() {
        assert_eq!(
            page_items(1, 10, 5),
            [Current(1), Page(2), Page(3), Page(4), Page(5), Gap, Page(10), Next(2)]
        );
        assert_eq!(
            page_items(3, 10, 5),
            [Back(2), Page(1), Page(2), Current(3), Page(4), Page(5), Gap, Page(10), Next(4)]
        );
    }

    #[test]
    fn middle_of_many_pages() {
        assert_eq!(
            page_items(5, 10, 5),
            [
                Back(4),
                Page(1),
                Gap,
                Page(3),
                Page(4),
                Current(5),
                Page(6),
                Page(7),
                Gap,
                Page(10),
                Next(6)
            ]
        );
    }

    #[test]
    fn no_gap_next_to_first_page() {
        assert_eq!(
            page_items(4, 10, 5),
            [Back(3), Page(1), Page(2), Page(3), Current(4), Page(5), Page(6), Gap, Page(10), Next(5)]
        );
    }

    #[test]
    fn end_of_many_pages() {
        assert_eq!(
            page_items(8, 10, 5),
            [Back(7), Page(1), Gap, Page(6), Page(7), Current(8), Page(9), Page(10), Next(9)]
        );
        assert_eq!(
            page_items(10, 10, 5),
            [Back(9), Page(1), Gap, Page(6), Page(7), Page(8), Page(9), Current(10)]
        );
    }
}
