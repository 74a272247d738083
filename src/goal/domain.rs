//! Core goal domain types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::UserID, db::MAX_AMOUNT};

/// A validated, non-empty goal title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct GoalTitle(String);

impl GoalTitle {
    /// Create a goal title.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyGoalTitle] if `title` is empty or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyGoalTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a goal title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for GoalTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for GoalTitle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalTitle::new(s)
    }
}

impl Display for GoalTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The amount of money a goal needs, always greater than zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TargetAmount(Decimal);

impl TargetAmount {
    /// Create a target amount.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::NonPositiveTarget] if `amount` is zero or negative,
    /// or an [Error::AmountTooLarge] if `amount` is more than [MAX_AMOUNT].
    pub fn new(amount: Decimal) -> Result<Self, Error> {
        if amount <= Decimal::ZERO {
            Err(Error::NonPositiveTarget(amount))
        } else if amount > MAX_AMOUNT {
            Err(Error::AmountTooLarge(amount))
        } else {
            Ok(Self(amount))
        }
    }

    /// Create a target amount without validation.
    ///
    /// The caller should ensure that `amount` is greater than zero, otherwise
    /// progress calculations will divide by zero or go negative.
    pub fn new_unchecked(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The target as a decimal amount of dollars.
    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl Display for TargetAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a goal.
pub type GoalId = i64;

/// A savings goal, funded from the user's net savings in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The ID of the user that owns the goal.
    pub user_id: UserID,
    /// What the user is saving for.
    pub title: GoalTitle,
    /// How much the user wants to save.
    pub target_amount: TargetAmount,
    /// The date the user wants to reach the target by.
    pub deadline: Date,
}

/// Form data for goal creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalFormData {
    /// The goal title as typed, checked by [GoalTitle::new].
    pub title: String,
    /// The target in dollars, checked by [TargetAmount::new].
    pub target_amount: Decimal,
    /// The date to reach the target by.
    pub deadline: Date,
}

impl GoalFormData {
    /// Check the title and target, returning them as validated values.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyGoalTitle], [Error::NonPositiveTarget] or [Error::AmountTooLarge].
    pub fn validate(&self) -> Result<(GoalTitle, TargetAmount), Error> {
        let title = GoalTitle::new(&self.title)?;
        let target_amount = TargetAmount::new(self.target_amount)?;

        Ok((title, target_amount))
    }
}
