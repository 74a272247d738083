//! The paths of every page and API route.
//!
//! Paths with a `{goal_id}` parameter are filled in with [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The route for downloading a user's transactions as a CSV report.
pub const EXPORT_TRANSACTIONS: &str = "/transactions/export";
/// The page for listing a user's savings goals.
pub const GOALS_VIEW: &str = "/goals";
/// The page for creating a new savings goal.
pub const NEW_GOAL_VIEW: &str = "/goals/new";
/// The page for editing an existing savings goal.
pub const EDIT_GOAL_VIEW: &str = "/goals/{goal_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route to access transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to create a goal.
pub const POST_GOAL: &str = "/api/goals";
/// The route to update a goal.
pub const PUT_GOAL: &str = "/api/goals/{goal_id}";
/// The route to delete a goal.
pub const DELETE_GOAL: &str = "/api/goals/{goal_id}";

/// Fill in the first `{...}` parameter of `endpoint_path` with `id`.
///
/// Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some((before, rest)) = endpoint_path.split_once('{') else {
        return endpoint_path.to_owned();
    };
    let after = rest.split_once('}').map_or("", |(_, after)| after);

    format!("{before}{id}{after}")
}
