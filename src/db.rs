//! Database initialisation and helpers shared by the ledger tables.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error, auth::create_user_table, goal::create_goal_table,
    transaction::create_transaction_table,
};

/// Create the tables for the domain models if they do not already exist.
///
/// The tables are created in a single SQL transaction, so either all of the
/// tables are created or none of them are.
///
/// # Errors
/// Returns an error if a table could not be created or there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_goal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// The largest transaction amount or goal target that can be stored, one trillion dollars.
///
/// Keeps sums over many transactions well inside the range of [Decimal].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Read the decimal stored as text in column `index` of `row`.
///
/// Amounts are stored as text so that SQLite never rounds them through a float.
pub fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    Decimal::from_str(&text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, error.into()))
}
