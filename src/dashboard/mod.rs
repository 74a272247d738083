//! Dashboard module
//!
//! Provides an overview page with the user's income and expense totals, how
//! far their net savings go towards each goal, and their latest transactions.

mod aggregation;
mod allocation;
mod cards;
mod handlers;
mod tables;

pub use aggregation::{FinancialSummary, compute_summary};
pub use allocation::{GoalProgress, allocate_goal_progress};
pub use handlers::get_dashboard_page;
