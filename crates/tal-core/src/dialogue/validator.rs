//! Declarative input validators.
//!
//! Validators are data so that thresholds stay per-script configuration
//! (one variant may require 7 phone digits, another 10).

use serde::{Deserialize, Serialize};

/// A pure predicate over the raw input with its rejection message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Validator {
    /// Input must contain something other than whitespace.
    NonBlank { message: String },
    /// Input must contain at least `min` ASCII digits, ignoring separators.
    MinDigits { min: usize, message: String },
    /// Trimmed input must be at least `min` characters long.
    MinLength { min: usize, message: String },
    /// Input must contain both "@" and ".".
    Email { message: String },
}

impl Validator {
    pub fn non_blank(message: impl Into<String>) -> Self {
        Self::NonBlank {
            message: message.into(),
        }
    }

    pub fn min_digits(min: usize, message: impl Into<String>) -> Self {
        Self::MinDigits {
            min,
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::Email {
            message: message.into(),
        }
    }

    /// Checks `input`, returning the rejection message on failure.
    pub fn check(&self, input: &str) -> Result<(), String> {
        let passed = match self {
            Validator::NonBlank { .. } => !input.trim().is_empty(),
            Validator::MinDigits { min, .. } => {
                input.chars().filter(|c| c.is_ascii_digit()).count() >= *min
            }
            Validator::MinLength { min, .. } => input.trim().chars().count() >= *min,
            Validator::Email { .. } => input.contains('@') && input.contains('.'),
        };

        if passed {
            Ok(())
        } else {
            Err(self.message().to_string())
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Validator::NonBlank { message }
            | Validator::MinDigits { message, .. }
            | Validator::MinLength { message, .. }
            | Validator::Email { message } => message,
        }
    }
}
