//! Goal editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
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
    goal::{GoalId, create::goal_form_fields, domain::GoalFormData, get_goal, update_goal},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::nav_bar,
};

/// The state needed for the edit goal page and the update endpoint.
#[derive(Debug, Clone)]
pub struct EditGoalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the goal editing page.
///
/// A goal that does not exist or belongs to another user renders the 404 page.
pub async fn get_edit_goal_page(
    Path(goal_id): Path<GoalId>,
    State(state): State<EditGoalState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = get_goal(goal_id, user_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve goal {goal_id}: {error}");
        }
    })?;

    let form_data = GoalFormData {
        title: goal.title.to_string(),
        target_amount: goal.target_amount.amount(),
        deadline: goal.deadline,
    };

    Ok(edit_goal_view(goal_id, &form_data).into_response())
}

/// Handle goal update form submission, redirects to the goals page on success.
pub async fn update_goal_endpoint(
    Path(goal_id): Path<GoalId>,
    State(state): State<EditGoalState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<GoalFormData>,
) -> Response {
    let (title, target_amount) = match form_data.validate() {
        Ok(validated) => validated,
        Err(error) => {
            return edit_goal_form_view(goal_id, &form_data, &format!("Error: {error}"))
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

    match update_goal(
        goal_id,
        user_id,
        title,
        target_amount,
        form_data.deadline,
        &connection,
    ) {
        Ok(_) => (
            HxRedirect(endpoints::GOALS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingGoal) => {
            tracing::warn!("User {user_id} tried to update missing goal {goal_id}");
            Error::UpdateMissingGoal.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_goal_view(goal_id: GoalId, form_data: &GoalFormData) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_GOAL_VIEW, goal_id);
    let nav_bar = nav_bar(&edit_endpoint);
    let form = edit_goal_form_view(goal_id, form_data, "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Goal", &[dollar_input_styles()], &content)
}

fn edit_goal_form_view(goal_id: GoalId, form_data: &GoalFormData, error_message: &str) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_GOAL, goal_id);

    html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Edit Goal" }

            (goal_form_fields(Some(form_data)))

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Goal" }
        }
    }
}
