//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    db::{MAX_AMOUNT, get_decimal},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. rent or groceries.
    #[default]
    Expense,
}

impl TransactionType {
    /// The lowercase name used in forms and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("\"{other}\" is not a transaction type")),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// The amount of money spent or earned in this transaction, never negative.
    pub amount: Decimal,
    /// Whether the amount was earned or spent.
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// A free text category, e.g. "Groceries".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserID,
        amount: Decimal,
        transaction_type: TransactionType,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            amount,
            transaction_type,
            date,
            category: String::new(),
            description: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The category and description default to empty strings. Pass the builder
/// to [create_transaction] to validate and store the transaction.
///
/// # Examples
///
/// ```ignore
/// use rust_decimal::Decimal;
/// use time::macros::date;
///
/// let transaction = Transaction::build(
///         user_id,
///         Decimal::new(4599, 2),
///         TransactionType::Expense,
///         date!(2025-01-15),
///     )
///     .category("Eating out")
///     .description("Coffee shop purchase");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user recording the transaction.
    pub user_id: UserID,

    /// The monetary amount of the transaction.
    ///
    /// The amount must be zero or greater. The direction of the money is given
    /// by `transaction_type`.
    pub amount: Decimal,

    /// Whether the amount was earned or spent.
    pub transaction_type: TransactionType,

    /// The date when the transaction occurred.
    pub date: Date,

    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category: String,

    /// A human-readable description of the transaction.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        category.trim().clone_into(&mut self.category);
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        description.trim().clone_into(&mut self.description);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, user_id, amount, transaction_type, date, category, description";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is less than zero,
/// - [Error::AmountTooLarge] if the amount is more than [MAX_AMOUNT],
/// - or [Error::SqlError] if there is some other SQL error, e.g. the user does not exist.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.amount < Decimal::ZERO {
        return Err(Error::NegativeAmount(builder.amount));
    }

    if builder.amount > MAX_AMOUNT {
        return Err(Error::AmountTooLarge(builder.amount));
    }

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, amount, transaction_type, date, category, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.user_id.as_i64(),
                builder.amount.to_string(),
                builder.transaction_type.as_str(),
                builder.date,
                builder.category,
                builder.description,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get all of the transactions recorded by `user_id`, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date ASC, id ASC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get a page of the transactions recorded by `user_id`, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_page_for_user(
    user_id: UserID,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        ))?
        .query_map(
            (user_id.as_i64(), to_sql_integer(limit)?, to_sql_integer(offset)?),
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the number of transactions recorded by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1;",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    u64::try_from(count).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, error.into()).into()
    })
}

/// SQLite integers are signed, so page sizes and offsets are bound as `i64`.
fn to_sql_integer(value: u64) -> Result<i64, Error> {
    i64::try_from(value).map_err(|error| {
        rusqlite::Error::ToSqlConversionFailure(error.into()).into()
    })
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount TEXT NOT NULL,
                transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Used by the transactions page and the dashboard.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must have the columns in the order of `TRANSACTION_COLUMNS`.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let amount = get_decimal(row, 2)?;
    let raw_transaction_type: String = row.get(3)?;
    let transaction_type = raw_transaction_type.parse().map_err(|error: String| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, error.into())
    })?;
    let date = row.get(4)?;
    let category = row.get(5)?;
    let description = row.get(6)?;

    Ok(Transaction {
        id,
        user_id,
        amount,
        transaction_type,
        date,
        category,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================
