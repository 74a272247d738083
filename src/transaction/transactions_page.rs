//! Defines the route handler for the page that displays transactions as a table.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::nav_bar,
    pagination::{
        PageItem, PaginationConfig, page_items, pagination_nav,
    },
    transaction::{
        Transaction, TransactionType,
        core::{count_transactions, get_transactions_page_for_user},
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Configuration for pagination controls.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Controls paginations of transactions table.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    /// The page number to display. Starts from 1.
    pub page: Option<u64>,
    /// The maximum number of transactions to display per page.
    pub per_page: Option<u64>,
}

/// Render an overview of the user's transactions, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user_id): Extension<UserID>,
    Query(query_params): Query<Pagination>,
) -> Result<Response, Error> {
    let current_page = query_params
        .page
        .unwrap_or(state.pagination_config.default_page)
        .max(1);
    let per_page = query_params
        .per_page
        .unwrap_or(state.pagination_config.default_page_size)
        .max(1);

    let limit = per_page;
    let offset = (current_page - 1).saturating_mul(per_page);

    let (transaction_count, transactions) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction_count = count_transactions(user_id, &connection)?;
        let transactions = get_transactions_page_for_user(user_id, limit, offset, &connection)
            .inspect_err(|error| {
                tracing::error!("Could not get transactions for user {user_id}: {error}")
            })?;

        (transaction_count, transactions)
    };

    let page_count = transaction_count.div_ceil(per_page);
    let max_pages = state.pagination_config.max_pages;
    let page_items = page_items(current_page, page_count, max_pages);

    Ok(transactions_view(&transactions, &page_items, per_page).into_response())
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let amount_style = match transaction.transaction_type {
        TransactionType::Income => "text-green-600 dark:text-green-400",
        TransactionType::Expense => "text-red-600 dark:text-red-400",
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.transaction_type) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class={ (TABLE_CELL_STYLE) " text-right " (amount_style) }
            {
                (format_currency(transaction.amount))
            }
        }
    }
}

/// The table of recent transactions, also used on the dashboard.
pub fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="overflow-x-auto w-full rounded-lg shadow"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    }
}

fn transactions_view(
    transactions: &[Transaction],
    page_items: &[PageItem],
    per_page: u64,
) -> Markup {
    let nav_bar = nav_bar(endpoints::TRANSACTIONS_VIEW);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-4"
            {
                div class="flex flex-wrap items-center justify-between gap-2"
                {
                    h1 class="text-2xl font-bold" { "Transactions" }

                    div class="flex gap-4"
                    {
                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "Add transaction"
                        }

                        a href=(endpoints::EXPORT_TRANSACTIONS) download class=(LINK_STYLE)
                        {
                            "Export CSV"
                        }
                    }
                }

                @if transactions.is_empty() {
                    p id="transactions-empty" class="text-gray-500 dark:text-gray-400"
                    {
                        "No transactions here yet. "
                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "Record your first one."
                        }
                    }
                } @else {
                    (transactions_table(transactions))

                    (pagination_nav(page_items, endpoints::TRANSACTIONS_VIEW, per_page))
                }
            }
        }
    };

    base("Transactions", &[], &content)
}
