//! The 500 page, and how HTMX requests get sent to it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{endpoints, html::error_view};

/// Renders the 500 page with a short `description` of what failed and a
/// suggested `fix`.
pub struct InternalServerError {
    pub description: String,
    pub fix: String,
}

impl InternalServerError {
    /// The 500 page for errors caused by the server's own settings, e.g. a bad
    /// timezone name.
    pub fn misconfigured(setting: &str, fix: String) -> Self {
        Self {
            description: format!("Invalid {setting} settings"),
            fix,
        }
    }
}

impl Default for InternalServerError {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.".to_owned(),
            fix: "Try again later or check the server logs.".to_owned(),
        }
    }
}

impl IntoResponse for InternalServerError {
    fn into_response(self) -> Response {
        let page = error_view("Internal Server Error", "500", &self.description, &self.fix);

        (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
    }
}

/// The error page route, which HTMX handlers redirect to.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}

/// Send an HTMX request to the 500 page.
///
/// HTMX does not follow a plain redirect with a full page load, so pages
/// loaded with GET should use [axum::response::Redirect] instead.
pub fn get_internal_server_error_redirect() -> Response {
    (
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
        .into_response()
}
