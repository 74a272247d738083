//! Table views for dashboard data display.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    dashboard::aggregation::FinancialSummary,
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, currency_rounded_with_tooltip},
};

const TABLE_STICKY_CELL_STYLE: &str = "px-3 py-4 font-medium text-gray-900 dark:text-white";
const TABLE_DATA_CELL_STYLE: &str = "text-right whitespace-nowrap";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: Decimal) -> &'static str {
    if amount >= Decimal::ZERO {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders a table with the total income, expenses and net savings.
pub(super) fn summary_table(summary: &FinancialSummary) -> Markup {
    html! {
        section id="summary" {
            h3 class="text-xl font-semibold mb-4" { "Summary" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    tbody {
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_STICKY_CELL_STYLE) { "Income" }
                            td
                                id="total-income"
                                class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " " (TABLE_CELL_GREEN_STYLE)}
                            {
                                (currency_rounded_with_tooltip(summary.total_income))
                            }
                        }

                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_STICKY_CELL_STYLE) { "Expenses" }
                            td
                                id="total-expense"
                                class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " " (TABLE_CELL_RED_STYLE)}
                            {
                                (currency_rounded_with_tooltip(summary.total_expense))
                            }
                        }

                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_STICKY_CELL_STYLE) { "Net Savings" }
                            td
                                id="net-savings"
                                class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " font-bold " (amount_color_class(summary.net_savings))}
                            {
                                (currency_rounded_with_tooltip(summary.net_savings))
                            }
                        }
                    }
                }
            }
        }
    }
}
