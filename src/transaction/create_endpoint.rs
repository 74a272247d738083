//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    timezone::local_today,
    transaction::{Transaction, TransactionType, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The value of the transaction in dollars.
    pub amount: Decimal,
    /// The date when the transaction ocurred.
    pub date: Date,
    /// A free text category.
    #[serde(default)]
    pub category: String,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(today) = local_today(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    if form.date > today {
        tracing::warn!("User {user_id} tried to create a transaction dated {}", form.date);

        return Error::FutureDate(form.date).into_alert_response();
    }

    let transaction = Transaction::build(user_id, form.amount, form.transaction_type, form.date)
        .category(&form.category)
        .description(&form.description);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(transaction, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "User {user_id} created {} transaction {}",
                transaction.transaction_type.as_str(),
                transaction.id
            );
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");

            return error.into_alert_response();
        }
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router,
        body::Body,
        extract::State,
        http::{Response, StatusCode},
        response::IntoResponse,
        routing::post,
    };
    use axum_extra::extract::Form;
    use axum_test::TestServer;
    use rust_decimal::Decimal;
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::UserID,
        endpoints,
        test_utils::{assert_hx_redirect, get_test_connection, insert_test_user},
        transaction::{
            TransactionType,
            core::{count_transactions, get_transactions_for_user},
            create_endpoint::{CreateTransactionState, TransactionForm},
            create_transaction_endpoint,
        },
    };

    fn get_test_state() -> (CreateTransactionState, UserID) {
        let conn = get_test_connection();
        let user_id = insert_test_user("alice", &conn);

        let state = CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, user_id)
    }

    async fn send_form(
        state: CreateTransactionState,
        user_id: UserID,
        form: TransactionForm,
    ) -> Response<Body> {
        create_transaction_endpoint(State(state), Extension(user_id), Form(form))
            .await
            .into_response()
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, user_id) = get_test_state();
        let form = TransactionForm {
            transaction_type: TransactionType::Income,
            amount: Decimal::new(1230, 2),
            date: OffsetDateTime::now_utc().date(),
            category: "Salary".to_owned(),
            description: "test transaction".to_owned(),
        };

        let response = send_form(state.clone(), user_id, form).await;

        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions_for_user(user_id, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        let transaction = &transactions[0];
        assert_eq!(transaction.amount, Decimal::new(1230, 2));
        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.category, "Salary");
        assert_eq!(transaction.description, "test transaction");
    }

    #[tokio::test]
    async fn create_fails_on_future_date() {
        let (state, user_id) = get_test_state();
        let form = TransactionForm {
            transaction_type: TransactionType::Expense,
            amount: Decimal::ONE,
            date: OffsetDateTime::now_utc().date() + Duration::days(2),
            category: String::new(),
            description: String::new(),
        };

        let response = send_form(state.clone(), user_id, form).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(user_id, &connection), Ok(0));
    }

    #[tokio::test]
    async fn create_fails_on_negative_amount() {
        let (state, user_id) = get_test_state();
        let form = TransactionForm {
            transaction_type: TransactionType::Expense,
            amount: Decimal::new(-500, 2),
            date: OffsetDateTime::now_utc().date(),
            category: String::new(),
            description: String::new(),
        };

        let response = send_form(state.clone(), user_id, form).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(user_id, &connection), Ok(0));
    }

    #[tokio::test]
    async fn form_deserialises_from_html_form() {
        let (state, user_id) = get_test_state();
        let app = Router::new()
            .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
            .layer(Extension(user_id))
            .with_state(state.clone());
        let server = TestServer::new(app).expect("Could not create test server.");
        let today = OffsetDateTime::now_utc().date().to_string();
        let form = [
            ("transaction_type", "expense"),
            ("amount", "45.99"),
            ("date", today.as_str()),
            ("category", "Eating out"),
            ("description", ""),
        ];

        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions_for_user(user_id, &connection).unwrap();
        assert_eq!(transactions[0].amount, Decimal::new(4599, 2));
        assert_eq!(transactions[0].transaction_type, TransactionType::Expense);
    }
}
