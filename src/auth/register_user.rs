//! The registration page for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, Username, ValidatedPassword, create_user, start_session},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, link,
        loading_spinner, log_in_register, password_input, username_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

/// The shortest password the browser will submit. The server checks strength separately.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

const INVALID_USERNAME_MSG: &str = "Usernames must be 1 to 150 characters long and may only \
    contain letters, digits and the characters @ . + - _";

const DUPLICATE_USERNAME_MSG: &str = "The username is already taken";

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

/// A problem with one of the registration form's fields, shown under that field.
enum FieldError {
    Username(String),
    Password(String),
    ConfirmPassword(String),
}

impl FieldError {
    fn for_username(&self) -> Option<&str> {
        match self {
            FieldError::Username(message) => Some(message),
            _ => None,
        }
    }

    fn for_password(&self) -> Option<&str> {
        match self {
            FieldError::Password(message) => Some(message),
            _ => None,
        }
    }

    fn for_confirm_password(&self) -> Option<&str> {
        match self {
            FieldError::ConfirmPassword(message) => Some(message),
            _ => None,
        }
    }
}

fn registration_form(username: &str, password: &str, error: Option<&FieldError>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #confirm-password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, error.and_then(FieldError::for_username)))
            (password_input(
                password,
                PASSWORD_INPUT_MIN_LENGTH,
                error.and_then(FieldError::for_password),
            ))
            (confirm_password_input(
                PASSWORD_INPUT_MIN_LENGTH,
                error.and_then(FieldError::for_confirm_password),
            ))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? " (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", "", None);
    let content = log_in_register("Create Account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// Signs and encrypts the session cookie.
    pub cookie_key: Key,
    /// How long the new user's first session lasts.
    pub session_duration: Duration,
    /// The database the user is saved to.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Check the username, password strength and that both passwords match, in that order.
fn validate(form: &RegisterForm) -> Result<(Username, ValidatedPassword), FieldError> {
    let username = Username::new(&form.username)
        .map_err(|_| FieldError::Username(INVALID_USERNAME_MSG.to_owned()))?;
    let password = ValidatedPassword::new(&form.password)
        .map_err(|error| FieldError::Password(error.to_string()))?;

    if form.password != form.confirm_password {
        return Err(FieldError::ConfirmPassword(
            "Passwords do not match".to_owned(),
        ));
    }

    Ok((username, password))
}

/// Handler for registering a new user via the POST method.
///
/// On success the user is logged in and redirected to the dashboard.
/// Otherwise the form is returned with an error message under the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let (username, validated_password) = match validate(&user_data) {
        Ok(valid) => valid,
        Err(error) => {
            return registration_form(&user_data.username, &user_data.password, Some(&error))
                .into_response();
        }
    };

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("Could not hash the new user's password: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let user = match state.db_connection.lock() {
        Ok(connection) => create_user(username.clone(), password_hash, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::DuplicateUsername(_)) => {
            let error = FieldError::Username(DUPLICATE_USERNAME_MSG.to_owned());
            return registration_form(username.as_ref(), &user_data.password, Some(&error))
                .into_response();
        }
        Err(error) => {
            tracing::error!("Could not save new user \"{username}\": {error}");
            return get_internal_server_error_redirect();
        }
    };

    tracing::info!("Registered user {} as \"{}\"", user.id, user.username);

    match start_session(jar, user.id, state.session_duration) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not start session for new user {}: {error}", user.id);
            get_internal_server_error_redirect()
        }
    }
}
