//! Goals listing page.

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
    endpoints,
    goal::{Goal, get_goals_for_user},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    navigation::nav_bar,
};

/// The state needed for the goals listing page.
#[derive(Debug, Clone)]
pub struct GoalsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the user's goals in the order net savings are allocated to them.
pub async fn get_goals_page(
    State(state): State<GoalsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goals = get_goals_for_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve goals: {error}"))?;

    Ok(goals_view(&goals).into_response())
}

fn goals_view(goals: &[Goal]) -> Markup {
    let new_goal_route = endpoints::NEW_GOAL_VIEW;
    let nav_bar = nav_bar(endpoints::GOALS_VIEW);

    let table_row = |goal: &Goal| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_GOAL, goal.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", goal.title);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (goal.title) }

                td class={ (TABLE_CELL_STYLE) " text-right" }
                {
                    (format_currency(goal.target_amount.amount()))
                }

                td class=(TABLE_CELL_STYLE) { (goal.deadline) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Goals" }

                    a href=(new_goal_route) class=(LINK_STYLE)
                    {
                        "Create Goal"
                    }
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Net savings fund goals from top to bottom."
                }

                div class="overflow-x-auto rounded-lg shadow dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Target" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Deadline" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for goal in goals {
                                (table_row(goal))
                            }

                            @if goals.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No goals created yet. "
                                        a href=(new_goal_route) class=(LINK_STYLE)
                                        {
                                            "Create your first goal"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Goals", &[], &content)
}

#[cfg(test)]
mod goals_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rust_decimal::Decimal;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        endpoints,
        goal::{GoalTitle, TargetAmount, create_goal},
        test_utils::{
            assert_status_ok, assert_valid_html, get_test_connection, insert_test_user,
            parse_html_document,
        },
    };

    use super::{GoalsPageState, get_goals_page};

    #[tokio::test]
    async fn lists_only_the_users_goals_in_creation_order() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice", &connection);
        let bob = insert_test_user("bob", &connection);
        for (title, user_id) in [("Zebra", alice), ("Secret", bob), ("Apple", alice)] {
            create_goal(
                user_id,
                GoalTitle::new_unchecked(title),
                TargetAmount::new_unchecked(Decimal::new(1050, 2)),
                date!(2030 - 01 - 01),
                &connection,
            )
            .unwrap();
        }
        let state = GoalsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_goals_page(State(state), Extension(alice)).await.unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let cell = Selector::parse("td").unwrap();
        let rows = document
            .select(&Selector::parse("tbody tr").unwrap())
            .map(|row| {
                row.select(&cell)
                    .take(3)
                    .map(|td| td.text().collect::<String>().trim().to_owned())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                vec!["Zebra", "$10.50", "2030-01-01"],
                vec!["Apple", "$10.50", "2030-01-01"],
            ]
        );

        let delete_button = document
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("want a delete button");
        assert_eq!(
            delete_button.value().attr("hx-delete"),
            Some(endpoints::format_endpoint(endpoints::DELETE_GOAL, 1).as_str())
        );
    }

    #[tokio::test]
    async fn shows_empty_state() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let state = GoalsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_goals_page(State(state), Extension(user_id)).await.unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let empty_row = document
            .select(&Selector::parse("tbody td[colspan]").unwrap())
            .next()
            .expect("want an empty state row");
        assert!(empty_row.text().collect::<String>().contains("No goals created yet."));
    }
}
