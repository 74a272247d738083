//! Downloads a user's transactions as a CSV report.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::Writer;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    transaction::{Transaction, get_transactions_for_user},
};

/// The file name suggested to the browser for the report.
const REPORT_FILE_NAME: &str = "transactions_report.csv";

const REPORT_HEADER: [&str; 6] = ["ID", "Date", "Type", "Category", "Description", "Amount"];

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportTransactionsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with all of the user's transactions as a CSV attachment, oldest first.
pub async fn export_transactions(
    State(state): State<ExportTransactionsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_for_user(user_id, &connection).inspect_err(|error| {
            tracing::error!("Could not get transactions for user {user_id}: {error}")
        })?
    };

    let report = write_report(&transactions)
        .inspect_err(|error| tracing::error!("Could not export transactions: {error}"))?;

    tracing::info!(
        "User {user_id} exported {} transactions",
        transactions.len()
    );

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
            ),
        ],
        report,
    )
        .into_response())
}

/// Write `transactions` as CSV with a header row.
fn write_report(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::from_writer(Vec::new());

    writer
        .write_record(REPORT_HEADER)
        .map_err(|error| Error::CsvExport(error.to_string()))?;

    for transaction in transactions {
        writer
            .write_record([
                transaction.id.to_string(),
                transaction.date.to_string(),
                transaction.transaction_type.to_string(),
                transaction.category.clone(),
                transaction.description.clone(),
                transaction.amount.to_string(),
            ])
            .map_err(|error| Error::CsvExport(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExport(error.to_string()))
}
