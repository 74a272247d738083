//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    dashboard::get_dashboard_page,
    endpoints,
    export::export_transactions,
    goal::{
        create_goal_endpoint, delete_goal_endpoint, get_edit_goal_page, get_goals_page,
        get_new_goal_page, update_goal_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, get_create_transaction_page, get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(endpoints::EXPORT_TRANSACTIONS, get(export_transactions))
        .route(endpoints::GOALS_VIEW, get(get_goals_page))
        .route(endpoints::NEW_GOAL_VIEW, get(get_new_goal_page))
        .route(endpoints::EDIT_GOAL_VIEW, get(get_edit_goal_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(endpoints::POST_GOAL, post(create_goal_endpoint))
            .route(endpoints::PUT_GOAL, put(update_goal_endpoint))
            .route(endpoints::DELETE_GOAL, delete(delete_goal_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
