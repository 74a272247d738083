//! The state shared by every route handler.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::DEFAULT_SESSION_DURATION, db::initialize, pagination::PaginationConfig};

/// Everything the server needs to answer requests.
///
/// Handlers do not take this directly. Each one declares a smaller state
/// struct holding just the fields it uses and implements `FromRef<AppState>`
/// for it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Signs and encrypts the session cookie.
    pub cookie_key: Key,

    /// How long a session lasts after the user's last request.
    pub session_duration: Duration,

    /// The canonical name of the server's timezone, e.g. "Pacific/Auckland".
    ///
    /// Used to decide what "today" is for transaction dates.
    pub local_timezone: String,

    /// How the transactions table is split into pages.
    pub pagination_config: PaginationConfig,

    /// The ledger database.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create the app state, creating any missing tables in `db_connection`.
    ///
    /// `cookie_secret` is hashed into the cookie key, so the same secret must
    /// be used across restarts for users to stay logged in.
    ///
    /// # Errors
    /// Returns an error if the database tables cannot be created.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            session_duration: DEFAULT_SESSION_DURATION,
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Derive the cookie key from the SHA-512 hash of `secret`.
pub fn create_cookie_key(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret))
}
