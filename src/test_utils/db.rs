use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, UserID, Username, create_user},
    db::initialize,
};

/// Open an in-memory database with all of the app's tables.
#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Register a user called `username` with a dummy password hash.
#[track_caller]
pub(crate) fn insert_test_user(username: &str, connection: &Connection) -> UserID {
    create_user(
        Username::new_unchecked(username),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
    .id
}
