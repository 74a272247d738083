//! The log-in page and the endpoint that checks credentials and starts a session.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        REMEMBER_ME_DURATION, User, get_user_by_username, safe_redirect_target, start_session,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, link, loading_spinner, log_in_register, password_input,
        username_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

/// Shown for both unknown usernames and wrong passwords so the form does not
/// reveal which usernames are registered.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";

/// The state needed to log a user in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// Signs and encrypts the session cookie.
    pub cookie_key: Key,
    /// How long a session lasts when "remember me" is not ticked.
    pub session_duration: Duration,
    /// The database holding the registered users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The query string of the log-in page.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    /// Where to send the user after they log in.
    pub redirect_url: Option<String>,
}

/// The data submitted by the log-in form.
#[derive(Debug, Deserialize)]
pub struct LogInForm {
    /// The username as typed, it is trimmed before use.
    pub username: String,
    /// The password as typed.
    pub password: String,
    /// Set to any value when the "remember me" checkbox is ticked, missing otherwise.
    pub remember_me: Option<String>,
    /// Where to send the user after they log in, carried over from the page's query string.
    pub redirect_url: Option<String>,
}

fn log_in_form(username: &str, redirect_url: Option<&str>, error: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (username_input(username, None))
            (password_input("", 0, error))

            div class="flex items-center gap-x-3"
            {
                input type="checkbox" name="remember_me" id="remember_me" class="rounded-xs";
                label for="remember_me" class="text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for a week"
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Forgot your password? " (link(endpoints::FORGOT_PASSWORD_VIEW, "Reset it here"))
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "New here? " (link(endpoints::REGISTER_VIEW, "Create an account"))
            }
        }
    }
}

fn checked_redirect_url(raw_url: Option<&str>) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = safe_redirect_target(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Ignoring unsafe redirect URL {raw_url:?}");
    }

    redirect_url
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = checked_redirect_url(query.redirect_url.as_deref());
    let form = log_in_form("", redirect_url.as_deref(), None);

    base("Log In", &[], &log_in_register("Log in", &form)).into_response()
}

/// Find the user called `username` and check that `password` is theirs.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if there is no such user or the
/// password is wrong, and other errors if the lookup or check could not be done.
fn authenticate(username: &str, password: &str, connection: &Connection) -> Result<User, Error> {
    let user = match get_user_by_username(username, connection) {
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        result => result?,
    };

    if user.password_hash.verify(password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Check the submitted credentials and start a session.
///
/// On success the client is sent to the page in the form's `redirect_url`,
/// or the dashboard. Wrong credentials re-render the form with an error.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    let redirect_url = checked_redirect_url(form.redirect_url.as_deref());
    let username = form.username.trim();

    let user = match state.db_connection.lock() {
        Ok(connection) => authenticate(username, &form.password, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            tracing::info!("Failed log-in attempt for \"{username}\"");
            let form = log_in_form(
                username,
                redirect_url.as_deref(),
                Some(INVALID_CREDENTIALS_ERROR_MSG),
            );
            return form.into_response();
        }
        Err(error) => {
            tracing::error!("Could not check credentials for \"{username}\": {error}");
            return get_internal_server_error_redirect();
        }
    };

    let duration = match form.remember_me {
        Some(_) => REMEMBER_ME_DURATION,
        None => state.session_duration,
    };

    match start_session(jar, user.id, duration) {
        Ok(jar) => {
            tracing::info!("User {} logged in", user.id);
            let redirect_url = redirect_url.unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());
            (StatusCode::SEE_OTHER, HxRedirect(redirect_url), jar).into_response()
        }
        Err(error) => {
            tracing::error!("Could not start session for user {}: {error}", user.id);
            get_internal_server_error_redirect()
        }
    }
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::extract::Query;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button, assert_hx_endpoint,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{RedirectQuery, get_log_in_page};

    #[tokio::test]
    async fn shows_log_in_form() {
        let response = get_log_in_page(Query(RedirectQuery::default())).await;

        assert_content_type(&response, "text/html; charset=utf-8");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOG_IN_API, "hx-post");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button(&form);

        let links = form
            .select(&Selector::parse("a[href]").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(
            links,
            vec![endpoints::FORGOT_PASSWORD_VIEW, endpoints::REGISTER_VIEW]
        );
    }

    #[tokio::test]
    async fn keeps_safe_redirect_url() {
        let response = get_log_in_page(Query(RedirectQuery {
            redirect_url: Some("/goals?x=1".to_owned()),
        }))
        .await;

        let document = parse_html_document(response).await;
        let input = document
            .select(&Selector::parse("input[name=redirect_url]").unwrap())
            .next()
            .expect("want a hidden redirect_url input");
        assert_eq!(input.value().attr("value"), Some("/goals?x=1"));
    }

    #[tokio::test]
    async fn drops_unsafe_redirect_url() {
        let response = get_log_in_page(Query(RedirectQuery {
            redirect_url: Some("https://evil.example".to_owned()),
        }))
        .await;

        let document = parse_html_document(response).await;
        assert!(
            document
                .select(&Selector::parse("input[name=redirect_url]").unwrap())
                .next()
                .is_none()
        );
    }
}
