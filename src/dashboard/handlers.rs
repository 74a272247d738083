//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::{
        aggregation::compute_summary,
        allocation::{GoalProgress, allocate_goal_progress},
        cards::goal_cards_view,
        tables::summary_table,
    },
    endpoints,
    goal::get_goals_for_user,
    html::{LINK_STYLE, base, link},
    navigation::nav_bar,
    transaction::{
        Transaction, get_transactions_for_user, get_transactions_page_for_user,
        transactions_table,
    },
};

/// How many of the newest transactions are shown on the dashboard.
const RECENT_TRANSACTION_COUNT: u64 = 10;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances and goals.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let (transactions, recent_transactions, goals) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transactions = get_transactions_for_user(user_id, &connection).inspect_err(|error| {
            tracing::error!("Could not get transactions for user {user_id}: {error}")
        })?;
        let recent_transactions =
            get_transactions_page_for_user(user_id, RECENT_TRANSACTION_COUNT, 0, &connection)
                .inspect_err(|error| {
                    tracing::error!("Could not get recent transactions for user {user_id}: {error}")
                })?;
        let goals = get_goals_for_user(user_id, &connection).inspect_err(|error| {
            tracing::error!("Could not get goals for user {user_id}: {error}")
        })?;

        (transactions, recent_transactions, goals)
    };

    let summary = compute_summary(&transactions)?;
    let goal_progress = allocate_goal_progress(summary.net_savings, goals);

    let summary_section = summary_table(&summary);

    Ok(dashboard_view(summary_section, &goal_progress, &recent_transactions).into_response())
}

/// Renders the dashboard with the summary, goal cards and recent transactions.
fn dashboard_view(
    summary_section: Markup,
    goal_progress: &[GoalProgress],
    recent_transactions: &[Transaction],
) -> Markup {
    let nav_bar = nav_bar(endpoints::DASHBOARD_VIEW);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center gap-8 px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="w-full grid grid-cols-1 xl:grid-cols-3 gap-8"
            {
                div class="xl:col-span-1" { (summary_section) }

                div class="xl:col-span-2" { (goal_cards_view(goal_progress)) }
            }

            (recent_transactions_view(recent_transactions))
        }
    );

    base("Dashboard", &[], &content)
}

fn recent_transactions_view(transactions: &[Transaction]) -> Markup {
    html!(
        section id="recent-transactions" class="w-full"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }

                @if !transactions.is_empty() {
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
                }
            }

            @if transactions.is_empty() {
                p id="recent-transactions-empty" class="text-gray-600 dark:text-gray-400"
                {
                    "Your totals will show up here once you "
                    (link(endpoints::NEW_TRANSACTION_VIEW, "add a transaction"))
                    "."
                }
            } @else {
                (transactions_table(transactions))
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rust_decimal::Decimal;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error,
        auth::UserID,
        dashboard::handlers::DashboardState,
        goal::{GoalTitle, TargetAmount, create_goal},
        test_utils::{assert_valid_html, get_test_connection, insert_test_user, parse_html_document},
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::get_dashboard_page;

    fn add_transaction(
        user_id: UserID,
        dollars: i64,
        transaction_type: TransactionType,
        connection: &rusqlite::Connection,
    ) {
        create_transaction(
            Transaction::build(
                user_id,
                Decimal::from(dollars),
                transaction_type,
                date!(2025 - 01 - 15),
            ),
            connection,
        )
        .expect("Could not create test transaction");
    }

    fn add_goal(user_id: UserID, title: &str, dollars: i64, connection: &rusqlite::Connection) {
        create_goal(
            user_id,
            GoalTitle::new_unchecked(title),
            TargetAmount::new_unchecked(Decimal::from(dollars)),
            date!(2030 - 01 - 01),
            connection,
        )
        .expect("Could not create test goal");
    }

    fn text_of(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn dashboard_allocates_net_savings_to_goals_in_order() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice", &connection);
        let bob = insert_test_user("bob", &connection);
        add_transaction(alice, 200, TransactionType::Income, &connection);
        add_transaction(alice, 80, TransactionType::Expense, &connection);
        add_transaction(bob, 900, TransactionType::Income, &connection);
        add_goal(alice, "A", 100, &connection);
        add_goal(alice, "B", 50, &connection);
        add_goal(bob, "Bob's goal", 10, &connection);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_dashboard_page(State(state), Extension(alice))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(text_of(&html, "#total-income"), vec!["$200"]);
        assert_eq!(text_of(&html, "#total-expense"), vec!["$80"]);
        assert_eq!(text_of(&html, "#net-savings"), vec!["$120"]);
        assert_eq!(text_of(&html, "[data-goal-card] h4"), vec!["A", "B"]);
        assert_eq!(text_of(&html, "[data-goal-progress]"), vec!["100%", "40%"]);
        assert_eq!(text_of(&html, "#recent-transactions tbody tr").len(), 2);
    }

    #[tokio::test]
    async fn dashboard_shows_empty_states_for_new_user() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(text_of(&html, "#net-savings"), vec!["$0"]);
        assert_eq!(text_of(&html, "#goals-empty").len(), 1);
        assert_eq!(text_of(&html, "#recent-transactions-empty").len(), 1);
    }

    #[tokio::test]
    async fn dashboard_limits_recent_transactions() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        for _ in 0..12 {
            add_transaction(user_id, 1, TransactionType::Income, &connection);
        }
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(text_of(&html, "#recent-transactions tbody tr").len(), 10);
        assert_eq!(text_of(&html, "#total-income"), vec!["$12"]);
    }

    #[tokio::test]
    async fn negative_net_savings_fund_no_goals() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        add_transaction(user_id, 50, TransactionType::Expense, &connection);
        add_goal(user_id, "A", 100, &connection);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(text_of(&html, "#net-savings"), vec!["-$50"]);
        assert_eq!(text_of(&html, "[data-goal-progress]"), vec!["0%"]);
    }

    #[tokio::test]
    async fn oversized_stored_totals_give_an_error_instead_of_panicking() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        for _ in 0..2 {
            connection
                .execute(
                    "INSERT INTO \"transaction\" (user_id, amount, transaction_type, date, category, description)
                     VALUES (?1, ?2, 'income', '2025-01-15', '', '')",
                    (user_id.as_i64(), Decimal::MAX.to_string()),
                )
                .unwrap();
        }
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = get_dashboard_page(State(state), Extension(user_id)).await;

        assert!(matches!(result, Err(Error::SummaryOverflow)));
    }
}
