//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The name a user logs in with.
///
/// Usernames are 1 to 150 characters long and only contain letters, digits
/// and the characters `@ . + - _`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// The maximum number of characters in a username.
    pub const MAX_LENGTH: usize = 150;

    /// Create a username, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidUsername] if the trimmed name is empty, longer than
    /// [Username::MAX_LENGTH] characters or contains a character that is not allowed.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let username = raw_username.trim();
        let length = username.chars().count();

        let is_allowed =
            |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');

        if length == 0 || length > Self::MAX_LENGTH || !username.chars().all(is_allowed) {
            return Err(Error::InvalidUsername);
        }

        Ok(Self(username.to_owned()))
    }

    /// Create a username without validation.
    ///
    /// The caller should ensure that `raw_username` is a valid username.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: Username,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::DuplicateUsername] if `username` is already taken, or
/// [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    username: Username,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO user (username, password) VALUES (?1, ?2)",
            (username.as_ref(), password_hash.to_string()),
        )
        .map_err(|error| match Error::from(error) {
            Error::DuplicateUsername(_) => Error::DuplicateUsername(username.to_string()),
            error => error,
        })?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username,
        password_hash,
    })
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_username: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(raw_id),
        username: Username::new_unchecked(&raw_username),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

/// Get the user from the database with the username `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has registered `username`, or
/// [Error::SqlError] if there was some other SQL error.
pub fn get_user_by_username(username: &str, db_connection: &Connection) -> Result<User, Error> {
    db_connection
        .prepare("SELECT id, username, password FROM user WHERE username = :username")?
        .query_row(&[(":username", username)], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the password hash of the user with `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist, or [Error::SqlError]
/// if there was some other SQL error.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.to_string(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))?;

    usize::try_from(count).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, error.into()).into()
    })
}


#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::auth::{
        PasswordHash, UserID, Username, count_users, create_user, get_user_by_username,
        update_password,
    };

    use super::{Error, create_user_table};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user(
            Username::new_unchecked("alice"),
            password_hash.clone(),
            &db_connection,
        )
        .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.username, Username::new_unchecked("alice"));
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_user_fails_on_duplicate_username() {
        let db_connection = get_db_connection();
        create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateUsername("alice".to_owned())));
    }

    #[test]
    fn get_user_by_username_finds_the_right_user() {
        let db_connection = get_db_connection();
        create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();
        let bob = create_user(
            Username::new_unchecked("bob"),
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_username("bob", &db_connection).unwrap();

        assert_eq!(retrieved_user, bob);
        assert_eq!(
            get_user_by_username("carol", &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_password_replaces_hash() {
        let db_connection = get_db_connection();
        let user = create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        update_password(user.id, &new_hash, &db_connection).unwrap();

        let retrieved_user = get_user_by_username("alice", &db_connection).unwrap();
        assert_eq!(retrieved_user.password_hash, new_hash);
    }

    #[test]
    fn update_password_fails_for_missing_user() {
        let db_connection = get_db_connection();

        let result = update_password(
            UserID::new(42),
            &PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn returns_correct_count() {
        let db_connection = get_db_connection();

        let count = count_users(&db_connection).expect("Could not get user count");
        assert_eq!(0, count, "Want zero users before insertion, got {count}");

        create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let count = count_users(&db_connection).expect("Could not get user count");
        assert_eq!(1, count, "Want one user after insertion, got {count}");
    }
}
