//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use time::Date;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of username and password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request has no session cookie.
    #[error("not logged in")]
    NoSession,

    /// The session cookie could not be created.
    #[error("could not create the session cookie: {0}")]
    SessionCookie(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The username is empty, too long or contains characters that are not allowed.
    #[error(
        "usernames must be 1 to 150 characters long and may only contain letters, \
        digits and the characters @ . + - _"
    )]
    InvalidUsername,

    /// Another user has already registered the username.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// An empty string was used to create a goal title.
    #[error("Goal title cannot be empty")]
    EmptyGoalTitle,

    /// A goal was given a target amount of zero or less.
    #[error("{0} is not a valid target amount, the target must be greater than zero")]
    NonPositiveTarget(Decimal),

    /// A transaction was given a negative amount.
    ///
    /// Whether money comes in or goes out is recorded by the transaction type,
    /// so amounts are always zero or more.
    #[error("{0} is not a valid amount, amounts cannot be negative")]
    NegativeAmount(Decimal),

    /// A transaction amount or goal target was larger than [crate::MAX_AMOUNT].
    #[error("{0} is too large, amounts can be at most {max}", max = crate::db::MAX_AMOUNT)]
    AmountTooLarge(Decimal),

    /// The totals of a user's transactions do not fit in a decimal.
    #[error("the transaction totals are too large to add up")]
    SummaryOverflow,

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The transactions could not be written out as CSV.
    #[error("could not write the CSV report: {0}")]
    CsvExport(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a goal that does not exist
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a goal that does not exist
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

fn timezone_fix(timezone: &str) -> String {
    format!(
        "\"{timezone}\" is not a known timezone. Restart the server with a canonical \
        timezone name such as \"Pacific/Auckland\"."
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => {
                InternalServerError::misconfigured("timezone", timezone_fix(&timezone))
                    .into_response()
            }
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid timezone settings".to_owned(),
                    details: timezone_fix(&timezone),
                },
            ),
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction date".to_owned(),
                    details: format!(
                        "{date} is a date in the future, which is not allowed. \
                        Change the date to today or earlier."
                    ),
                },
            ),
            Error::NegativeAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction amount".to_owned(),
                    details: format!(
                        "{amount} is negative. Enter the amount as a positive number and \
                        choose whether it is income or an expense."
                    ),
                },
            ),
            Error::AmountTooLarge(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Amount too large".to_owned(),
                    details: format!(
                        "{amount} is more than the largest allowed amount of {}.",
                        crate::db::MAX_AMOUNT
                    ),
                },
            ),
            Error::EmptyGoalTitle => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid goal title".to_owned(),
                    details: "The goal title cannot be empty.".to_owned(),
                },
            ),
            Error::NonPositiveTarget(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid target amount".to_owned(),
                    details: format!("{amount} is not allowed. The target must be more than $0."),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested resource could not be found.".to_owned(),
                },
            ),
            Error::UpdateMissingGoal => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update goal".to_owned(),
                    details: "The goal could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingGoal => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete goal".to_owned(),
                    details: "The goal could not be found. \
                    Try refreshing the page to see if the goal has already been deleted."
                        .to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
