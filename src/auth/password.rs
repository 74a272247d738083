//! Password strength checks and bcrypt hashes.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A plain text password that is strong enough to be hashed and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's suggestions when the password
    /// scores below three.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, &[]);

        if matches!(entropy.score(), Score::Three | Score::Four) {
            return Ok(Self(raw_password.to_owned()));
        }

        let advice = entropy
            .feedback()
            .map(|feedback| feedback.to_string())
            .filter(|advice| !advice.trim().is_empty())
            .unwrap_or_else(|| "Try a longer password with less common words.".to_owned());

        Err(Error::TooWeak(advice))
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// Used for test fixtures, where a short password keeps things readable.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("********")
    }
}

/// A salted bcrypt hash of a password, as stored in the user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used outside of tests.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// Tests should pass a low cost such as 4 to stay fast.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. for an out of range cost.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read from the database.
    pub fn new_unchecked(raw_hash: &str) -> Self {
        Self(raw_hash.to_owned())
    }

    /// Whether `raw_password` is the password this hash was made from.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        bcrypt::verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{PasswordHash, ValidatedPassword};

    #[test]
    fn weak_passwords_are_rejected_with_advice() {
        for weak in ["", "password", "qwerty123"] {
            match ValidatedPassword::new(weak) {
                Err(Error::TooWeak(advice)) => assert!(!advice.is_empty(), "no advice for {weak:?}"),
                other => panic!("want TooWeak for {weak:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn strong_password_is_accepted() {
        assert!(ValidatedPassword::new("correct horse battery staple").is_ok());
    }

    #[test]
    fn display_masks_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert_eq!(password.to_string(), "********");
    }

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), 4).unwrap();

        assert_eq!(hash.verify("hunter2"), Ok(true));
        assert_eq!(hash.verify("hunter3"), Ok(false));
    }

    #[test]
    fn hashing_is_salted() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        let first = PasswordHash::new(password.clone(), 4).unwrap();
        let second = PasswordHash::new(password, 4).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_cannot_verify() {
        let hash = PasswordHash::new_unchecked("not a bcrypt hash");

        assert!(matches!(hash.verify("hunter2"), Err(Error::HashingError(_))));
    }
}
