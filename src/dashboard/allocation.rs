//! Allocates a user's net savings to their goals.
//!
//! Goals are funded greedily in the order given. Each goal takes as much of
//! the remaining savings as it needs. The first goal that cannot be fully
//! funded takes whatever is left, and every goal after it gets nothing.

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::goal::Goal;

/// How much of a goal is covered by the user's net savings.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    /// The goal being funded.
    pub goal: Goal,
    /// The percentage of the target that is funded, from 0 to 100.
    pub progress: f64,
    /// The amount of net savings allocated to this goal.
    pub funded_amount: Decimal,
}

/// Fund `goals` in order from `net_savings`.
///
/// The output has one entry per goal in the same order as `goals`.
/// Zero or negative net savings leave every goal at 0%.
/// The targets of `goals` must be greater than zero.
pub fn allocate_goal_progress(net_savings: Decimal, goals: Vec<Goal>) -> Vec<GoalProgress> {
    let mut remaining = net_savings;

    goals
        .into_iter()
        .map(|goal| {
            let target = goal.target_amount.amount();

            let (progress, funded_amount) = if remaining >= target {
                remaining -= target;
                (100.0, target)
            } else if remaining > Decimal::ZERO {
                let progress = partial_progress(remaining, target, &goal);
                let funded_amount = remaining;
                remaining = Decimal::ZERO;
                (progress, funded_amount)
            } else {
                (0.0, Decimal::ZERO)
            };

            GoalProgress {
                goal,
                progress,
                funded_amount,
            }
        })
        .collect()
}

/// The percentage of `target` covered by `funded`, where `0 < funded < target`.
fn partial_progress(funded: Decimal, target: Decimal, goal: &Goal) -> f64 {
    // The ratio is below one, so scaling it to a percentage cannot overflow.
    let progress = funded
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percentage| percentage.to_f64());

    match progress {
        Some(progress) => progress.clamp(0.0, 100.0),
        None => {
            tracing::warn!(
                "Could not calculate progress for goal {} with {funded} of {target}",
                goal.id
            );
            0.0
        }
    }
}
