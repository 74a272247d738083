//! Fintracker is a web app for tracking personal income, expenses and
//! savings goals.
//!
//! This library provides a REST API that directly serves HTML pages.
//! Users record transactions, set savings goals and see a dashboard that
//! summarises their finances and shows how far their net savings go towards
//! each goal.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod export;
mod goal;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, Username, ValidatedPassword, count_users, create_user,
    get_user_by_username, update_password,
};
pub use dashboard::{FinancialSummary, GoalProgress, allocate_goal_progress, compute_summary};
pub use db::{MAX_AMOUNT, initialize as initialize_db};
pub use error::Error;
pub use goal::{Goal, GoalTitle, TargetAmount, create_goal};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{Transaction, TransactionBuilder, TransactionType, create_transaction};

/// How long open connections get to finish once shutdown starts.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Wait for ctrl+c or, on unix, SIGTERM and then tell the server behind
/// `handle` to shut down gracefully.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for SIGTERM: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = ctrl_c => "ctrl+c",
        _ = terminate => "terminate",
    };

    tracing::info!("Received {signal_name} signal, shutting down");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}
