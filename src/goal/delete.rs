//! Goal deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserID,
    goal::{GoalId, db::delete_goal},
};

/// The state needed for deleting a goal.
#[derive(Debug, Clone)]
pub struct DeleteGoalEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGoalEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle goal deletion. Returns success alert or error.
pub async fn delete_goal_endpoint(
    Path(goal_id): Path<GoalId>,
    State(state): State<DeleteGoalEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_goal(goal_id, user_id, &connection) {
        Ok(_) => {
            tracing::info!("User {user_id} deleted goal {goal_id}");

            Alert::SuccessSimple {
                message: "Goal deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(Error::DeleteMissingGoal) => Error::DeleteMissingGoal.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting goal {goal_id}: {error}");
            error.into_alert_response()
        }
    }
}
