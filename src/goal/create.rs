//! Goal creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    goal::{create_goal, domain::GoalFormData},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles,
    },
    navigation::nav_bar,
};

/// The state needed for creating a goal.
#[derive(Debug, Clone)]
pub struct CreateGoalEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the goal creation page.
pub async fn get_new_goal_page() -> Response {
    new_goal_view().into_response()
}

/// Handle goal creation form submission, redirects to the dashboard on success.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<GoalFormData>,
) -> Response {
    let (title, target_amount) = match form_data.validate() {
        Ok(validated) => validated,
        Err(error) => {
            return new_goal_form_view(Some(&form_data), &format!("Error: {error}"))
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_goal(
        user_id,
        title,
        target_amount,
        form_data.deadline,
        &connection,
    ) {
        Ok(goal) => {
            tracing::info!("User {user_id} created goal {}", goal.id);

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a goal: {error}");

            error.into_alert_response()
        }
    }
}

fn new_goal_view() -> Markup {
    let nav_bar = nav_bar(endpoints::NEW_GOAL_VIEW);
    let form = new_goal_form_view(None, "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Goal", &[dollar_input_styles()], &content)
}

fn new_goal_form_view(form_data: Option<&GoalFormData>, error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_GOAL)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "New Goal" }

            (goal_form_fields(form_data))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Goal" }
        }
    }
}

/// The title, target and deadline inputs shared by the create and edit forms.
///
/// The inputs are prefilled from `form_data` when it is given.
pub(super) fn goal_form_fields(form_data: Option<&GoalFormData>) -> Markup {
    let title = form_data.map(|form| form.title.as_str());
    let target_amount = form_data.map(|form| form.target_amount);
    let deadline = form_data.map(|form| form.deadline);

    html! {
        div
        {
            label
                for="title"
                class=(FORM_LABEL_STYLE)
            {
                "Title"
            }

            input
                id="title"
                type="text"
                name="title"
                placeholder="Emergency fund"
                value=[title]
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="target_amount"
                class=(FORM_LABEL_STYLE)
            {
                "Target Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    id="target_amount"
                    type="number"
                    name="target_amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    value=[target_amount]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="deadline"
                class=(FORM_LABEL_STYLE)
            {
                "Deadline"
            }

            input
                id="deadline"
                type="date"
                name="deadline"
                value=[deadline]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}


#[cfg(test)]
mod create_goal_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::State,
        http::{StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
    };
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        auth::UserID,
        endpoints,
        goal::{
            create::CreateGoalEndpointState, create_goal_endpoint, domain::GoalFormData,
            get_goals_for_user,
        },
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_hx_redirect,
            assert_valid_html, get_header, get_test_connection, insert_test_user, must_get_form,
            parse_html_fragment,
        },
    };

    fn get_goal_state() -> (CreateGoalEndpointState, UserID) {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);

        let state = CreateGoalEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, user_id)
    }

    #[tokio::test]
    async fn can_create_goal() {
        let (state, user_id) = get_goal_state();
        let form = GoalFormData {
            title: "New car".to_owned(),
            target_amount: Decimal::new(500000, 2),
            deadline: date!(2030 - 12 - 31),
        };

        let response = create_goal_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let goals = get_goals_for_user(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].title.as_ref(), "New car");
        assert_eq!(goals[0].target_amount.amount(), Decimal::new(500000, 2));
        assert_eq!(goals[0].deadline, date!(2030 - 12 - 31));
    }

    #[tokio::test]
    async fn create_goal_fails_on_empty_title() {
        let (state, user_id) = get_goal_state();
        let form = GoalFormData {
            title: "  ".to_owned(),
            target_amount: Decimal::ONE,
            deadline: date!(2030 - 12 - 31),
        };

        let response = create_goal_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "text/html; charset=utf-8"
        );
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Goal title cannot be empty");
        assert_eq!(
            get_goals_for_user(user_id, &state.db_connection.lock().unwrap()),
            Ok(vec![])
        );
    }

    #[tokio::test]
    async fn create_goal_fails_on_zero_target_and_keeps_input() {
        let (state, user_id) = get_goal_state();
        let form = GoalFormData {
            title: "Holiday".to_owned(),
            target_amount: Decimal::ZERO,
            deadline: date!(2030 - 12 - 31),
        };

        let response = create_goal_endpoint(State(state.clone()), Extension(user_id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(
            &form,
            "Error: 0 is not a valid target amount, the target must be greater than zero",
        );
        assert_form_input_with_value(&form, "title", "text", "Holiday");
        assert_eq!(
            get_goals_for_user(user_id, &state.db_connection.lock().unwrap()),
            Ok(vec![])
        );
    }
}
