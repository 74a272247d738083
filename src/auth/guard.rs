//! Middleware that only lets requests with a valid session through.
//!
//! Requests without a session are sent to the log-in page, which is told
//! where to send the user back to afterwards via a `redirect_url` query
//! parameter.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, Uri, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::session::{read_session, refresh_session},
    endpoints,
};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How far each request pushes out the expiry of the session.
    pub session_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Check that `raw_url` is a path on this site that it is safe to send a user to
/// after logging in, returning the path and query if so.
///
/// Absolute URLs, protocol relative URLs (including ones starting with `/\`) and the
/// log-in page itself are rejected.
pub fn safe_redirect_target(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    // Browsers treat a backslash like a slash, so "/\host" is protocol relative too.
    let target = uri.path_and_query()?.as_str();
    let is_local = target
        .strip_prefix('/')
        .is_some_and(|rest| !rest.starts_with(['/', '\\']));

    (is_local && uri.path() != endpoints::LOG_IN_VIEW).then(|| target.to_owned())
}

/// The page the user was trying to reach.
///
/// HTMX requests to the API come from a page, so the page in `HX-Current-URL`
/// is used instead of the API route.
fn requested_page(request: &Request) -> Option<String> {
    if !request.uri().path().starts_with("/api") {
        return safe_redirect_target(request.uri().path_and_query()?.as_str());
    }

    let headers = request.headers();
    if header_value(headers, "hx-request") != Some("true") {
        tracing::warn!("API request to {} was not made by HTMX", request.uri());
        return None;
    }

    // HX-Current-URL is a full URL, only the path and query are kept.
    let current_url = header_value(headers, "hx-current-url")?.parse::<Uri>().ok()?;
    safe_redirect_target(current_url.path_and_query()?.as_str())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// The URL of the log-in page that returns the user to `target` afterwards.
pub fn log_in_url_with_redirect(target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// How to tell the client to go to the log-in page.
#[derive(Clone, Copy)]
enum Rejection {
    /// A plain 303 redirect for page loads.
    Redirect,
    /// An `HX-Redirect` header for HTMX requests, which do not follow 303s
    /// with a full page load.
    HxRedirect,
}

impl Rejection {
    fn to_log_in(self, log_in_url: String) -> Response {
        match self {
            Rejection::Redirect => Redirect::to(&log_in_url).into_response(),
            Rejection::HxRedirect => (HxRedirect(log_in_url), StatusCode::OK).into_response(),
        }
    }
}

async fn guard(state: AuthState, request: Request, next: Next, rejection: Rejection) -> Response {
    let log_in_url = log_in_url_with_redirect(
        requested_page(&request)
            .as_deref()
            .unwrap_or(endpoints::DASHBOARD_VIEW),
    );

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Could not read cookies: {error:?}");
            return rejection.to_log_in(log_in_url);
        }
    };

    let session = match read_session(&jar) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!("Rejected request without a valid session: {error}");
            return rejection.to_log_in(log_in_url);
        }
    };

    parts.extensions.insert(session.user_id);
    let response = next.run(Request::from_parts(parts, body)).await;

    let jar = refresh_session(jar.clone(), state.session_duration).unwrap_or_else(|error| {
        tracing::error!("Could not refresh session for user {}: {error}", session.user_id);
        jar
    });

    let (mut parts, body) = response.into_parts();
    for cookie in jar.into_response().headers().get_all(SET_COOKIE) {
        parts.headers.append(SET_COOKIE, cookie.clone());
    }

    Response::from_parts(parts, body)
}

/// Only let requests with a valid session through to page routes.
///
/// The user's [UserID](crate::auth::UserID) is added to the request
/// extensions, so handlers can take `Extension(user_id): Extension<UserID>`.
/// Other requests are redirected to the log-in page.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, Rejection::Redirect).await
}

/// Like [auth_guard], but for routes called by HTMX, which are sent to the
/// log-in page with an `HX-Redirect` header.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, Rejection::HxRedirect).await
}

#[cfg(test)]
mod redirect_target_tests {
    use crate::endpoints;

    use super::{log_in_url_with_redirect, safe_redirect_target};

    #[test]
    fn accepts_local_paths_with_queries() {
        assert_eq!(
            safe_redirect_target("/transactions?page=2&per_page=10"),
            Some("/transactions?page=2&per_page=10".to_owned())
        );
    }

    #[test]
    fn rejects_other_sites() {
        assert_eq!(safe_redirect_target("https://example.com/goals"), None);
        assert_eq!(safe_redirect_target("//example.com/goals"), None);
    }

    #[test]
    fn rejects_paths_browsers_read_as_other_sites() {
        for target in ["/\\example.com", "/\\/example.com", "/\\\\example.com"] {
            assert_eq!(safe_redirect_target(target), None, "accepted {target:?}");
        }
    }

    #[test]
    fn rejects_relative_paths() {
        assert_eq!(safe_redirect_target("goals"), None);
    }

    #[test]
    fn rejects_log_in_page() {
        assert_eq!(safe_redirect_target(endpoints::LOG_IN_VIEW), None);
        assert_eq!(
            safe_redirect_target(&format!("{}?redirect_url=%2Fgoals", endpoints::LOG_IN_VIEW)),
            None
        );
    }

    #[test]
    fn log_in_url_encodes_target() {
        assert_eq!(
            log_in_url_with_redirect("/transactions?page=2"),
            format!("{}?redirect_url=%2Ftransactions%3Fpage%3D2", endpoints::LOG_IN_VIEW)
        );
    }
}
