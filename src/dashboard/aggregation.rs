//! Aggregates a user's transactions into income, expense and net savings totals.

use rust_decimal::Decimal;

use crate::{
    Error,
    transaction::{Transaction, TransactionType},
};

/// The totals shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinancialSummary {
    /// The sum of all income transactions.
    pub total_income: Decimal,
    /// The sum of all expense transactions.
    pub total_expense: Decimal,
    /// Income minus expenses, may be negative.
    pub net_savings: Decimal,
}

/// Sum the income and expenses in `transactions`.
///
/// An empty slice gives a summary of all zeros.
///
/// # Errors
///
/// Returns [Error::SummaryOverflow] if a total does not fit in a [Decimal].
/// Amounts are capped at [crate::MAX_AMOUNT] when they are stored, so this
/// needs an impractically large number of transactions.
pub fn compute_summary(transactions: &[Transaction]) -> Result<FinancialSummary, Error> {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;

    for transaction in transactions {
        let total = match transaction.transaction_type {
            TransactionType::Income => &mut total_income,
            TransactionType::Expense => &mut total_expense,
        };

        *total = total.checked_add(transaction.amount).ok_or_else(|| {
            tracing::error!(
                "Overflow adding transaction {} to the totals for user {}",
                transaction.id,
                transaction.user_id
            );
            Error::SummaryOverflow
        })?;
    }

    let net_savings = total_income
        .checked_sub(total_expense)
        .ok_or(Error::SummaryOverflow)?;

    Ok(FinancialSummary {
        total_income,
        total_expense,
        net_savings,
    })
}
