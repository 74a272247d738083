//! Logging out.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::end_session, endpoints};

/// End the session and send the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (end_session(jar), Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
