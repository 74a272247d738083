//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and querying a user's transactions
//! - View handlers for transaction-related web pages
//!
//! Transactions cannot be edited or deleted once recorded.

mod core;
mod create_endpoint;
mod create_page;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, create_transaction,
    create_transaction_table, get_transactions_for_user, get_transactions_page_for_user,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use transactions_page::{get_transactions_page, transactions_table};
