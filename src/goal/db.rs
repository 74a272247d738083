//! Database operations for goals.
//!
//! Every query is scoped by the owning user, so a goal that belongs to
//! someone else looks the same as a goal that does not exist.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    db::get_decimal,
    goal::{Goal, GoalId, GoalTitle, TargetAmount},
};

const GOAL_COLUMNS: &str = "id, user_id, title, target_amount, deadline";

/// Create a goal for `user_id` and return it with its generated ID.
pub fn create_goal(
    user_id: UserID,
    title: GoalTitle,
    target_amount: TargetAmount,
    deadline: Date,
    connection: &Connection,
) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO goal (user_id, title, target_amount, deadline)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {GOAL_COLUMNS};"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                title.as_ref(),
                target_amount.amount().to_string(),
                deadline,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single goal owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the goal does not exist or belongs to another user.
pub fn get_goal(goal_id: GoalId, user_id: UserID, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal WHERE id = :id AND user_id = :user_id;"
        ))?
        .query_row(
            &[(":id", &goal_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the goals of `user_id` in the order they were created.
///
/// This is the order that net savings are allocated to goals.
pub fn get_goals_for_user(user_id: UserID, connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal WHERE user_id = :user_id ORDER BY id ASC;"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Replace the title, target and deadline of a goal. Returns an error if the
/// goal doesn't exist or belongs to another user.
pub fn update_goal(
    goal_id: GoalId,
    user_id: UserID,
    title: GoalTitle,
    target_amount: TargetAmount,
    deadline: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET title = ?1, target_amount = ?2, deadline = ?3
         WHERE id = ?4 AND user_id = ?5",
        (
            title.as_ref(),
            target_amount.amount().to_string(),
            deadline,
            goal_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Delete a goal by ID. Returns an error if the goal doesn't exist or belongs
/// to another user.
pub fn delete_goal(goal_id: GoalId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM goal WHERE id = ?1 AND user_id = ?2",
        (goal_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

/// Initialize the goal table and indexes.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            target_amount TEXT NOT NULL,
            deadline TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_goal_user ON goal(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let raw_title: String = row.get(2)?;
    let title = GoalTitle::new_unchecked(&raw_title);
    let target_amount = TargetAmount::new_unchecked(get_decimal(row, 3)?);
    let deadline = row.get(4)?;

    Ok(Goal {
        id,
        user_id,
        title,
        target_amount,
        deadline,
    })
}
