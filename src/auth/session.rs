//! Sessions stored in a private (encrypted and signed) cookie.
//!
//! The cookie value is a JSON [Session] holding the user's ID and the unix
//! timestamp at which the session expires.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

/// The name of the cookie holding the session.
pub const SESSION_COOKIE: &str = "session";
/// How long a session lasts without any activity.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::minutes(5);
/// How long a session lasts when the user asks to stay logged in.
pub const REMEMBER_ME_DURATION: Duration = Duration::days(7);

/// The contents of the session cookie.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The logged in user.
    pub user_id: UserID,
    /// When the session stops being valid.
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    fn starting_now(user_id: UserID, duration: Duration) -> Result<Self, Error> {
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(duration)
            .ok_or_else(|| Error::SessionCookie(format!("a duration of {duration} overflows")))?;

        Ok(Self {
            user_id,
            expires_at,
        })
    }

    fn into_cookie(self) -> Result<Cookie<'static>, Error> {
        let value =
            serde_json::to_string(&self).map_err(|error| Error::SessionCookie(error.to_string()))?;

        Ok(Cookie::build((SESSION_COOKIE, value))
            .expires(self.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .build())
    }
}

/// Log in `user_id` for `duration` by adding a session cookie to `jar`.
///
/// # Errors
///
/// Returns [Error::SessionCookie] if the expiry overflows or the session
/// cannot be serialised.
pub fn start_session(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let cookie = Session::starting_now(user_id, duration)?.into_cookie()?;

    Ok(jar.add(cookie))
}

/// Overwrite the session cookie with an expired placeholder so the browser drops it.
pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, ""))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session from `jar`.
///
/// # Errors
///
/// Returns [Error::NoSession] if there is no session cookie and
/// [Error::InvalidCredentials] if the cookie cannot be read or has expired.
pub fn read_session(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(Error::NoSession)?;

    let session: Session =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidCredentials)?;

    if session.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::InvalidCredentials);
    }

    Ok(session)
}

/// Push the expiry of the session in `jar` out to at least `duration` from now.
///
/// A session that already lasts longer, e.g. one started with
/// [REMEMBER_ME_DURATION], keeps its expiry.
///
/// # Errors
///
/// Returns an error if the session is missing or invalid, or if the new expiry
/// cannot be calculated. `jar` is consumed either way, so callers that want to
/// fall back to the original cookies should pass in a clone.
pub fn refresh_session(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let session = read_session(&jar)?;
    let refreshed = Session::starting_now(session.user_id, duration)?;

    let session = Session {
        user_id: session.user_id,
        expires_at: session.expires_at.max(refreshed.expires_at),
    };

    Ok(jar.add(session.into_cookie()?))
}
