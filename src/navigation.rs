//! The site header with links to each section, plus a tab bar for small screens.

use maud::{Markup, html};

use crate::endpoints;

/// The sections shown in the navigation bar, in display order.
const SECTIONS: [(&str, &str); 3] = [
    (endpoints::DASHBOARD_VIEW, "Dashboard"),
    (endpoints::TRANSACTIONS_VIEW, "Transactions"),
    (endpoints::GOALS_VIEW, "Goals"),
];

const HEADER_LINK_STYLE: &str = "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
    lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
    dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700";
const HEADER_LINK_CURRENT_STYLE: &str = "block py-2 px-3 text-white bg-blue-700 rounded-sm
    lg:bg-transparent lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500";
const TAB_STYLE: &str = "flex w-full min-w-0 items-center justify-center rounded-lg px-2 py-2
    text-xs font-semibold text-gray-600 hover:bg-blue-50/70 hover:text-blue-700
    sm:text-sm dark:text-gray-300 dark:hover:bg-blue-900/20";
const TAB_CURRENT_STYLE: &str = "flex w-full min-w-0 items-center justify-center rounded-lg px-2 py-2
    bg-blue-50 text-xs font-semibold text-blue-700 shadow-sm sm:text-sm
    dark:bg-blue-900/30 dark:text-blue-200";

/// Whether `current_page` is `section` or one of its sub-pages, e.g.
/// "/goals/3/edit" belongs to "/goals".
fn is_in_section(current_page: &str, section: &str) -> bool {
    current_page
        .strip_prefix(section)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Render the navigation bar with the section containing `current_page` highlighted.
pub fn nav_bar(current_page: &str) -> Markup {
    let links: Vec<(&str, &str, bool)> = SECTIONS
        .iter()
        .map(|&(url, title)| (url, title, is_in_section(current_page, url)))
        .chain([(endpoints::LOG_OUT, "Log out", false)])
        .collect();

    html!(
        nav class="bg-white border-gray-200 dark:bg-gray-900"
        {
            div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
            {
                a
                    href=(endpoints::ROOT)
                    class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                {
                    "Fintracker"
                }

                ul class="hidden lg:flex lg:flex-row lg:space-x-8 font-medium"
                {
                    @for (url, title, is_current) in &links {
                        li {
                            a
                                href=(url)
                                class=(if *is_current { HEADER_LINK_CURRENT_STYLE } else { HEADER_LINK_STYLE })
                                aria-current=[is_current.then_some("page")]
                            { (title) }
                        }
                    }
                }
            }
        }

        nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
        {
            ul
                class="mx-4 mb-4 grid grid-cols-4 gap-2 rounded-xl border border-gray-200
                bg-white/95 px-4 py-3 shadow-lg dark:border-gray-700 dark:bg-gray-900/95"
                aria-label="Sections"
            {
                @for (url, title, is_current) in &links {
                    li class="min-w-0" {
                        a
                            href=(url)
                            class=(if *is_current { TAB_CURRENT_STYLE } else { TAB_STYLE })
                            aria-current=[is_current.then_some("page")]
                        {
                            span class="truncate" { (title) }
                        }
                    }
                }
            }
        }
    )
}
