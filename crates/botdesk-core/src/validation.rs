//! Operator input validation.
//!
//! Validation failures are reported synchronously and block the action.
//! Nothing that fails here is ever sent to a collaborator.

use std::fmt;

/// Rejected operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left empty.
    Missing { field: &'static str },
    /// Day count is not a positive whole number.
    InvalidDays { input: String },
    /// Checkout attempted with nothing selected.
    EmptyCart,
    /// Email does not look like an address.
    InvalidEmail { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing { field } => write!(f, "Please fill in the {field}"),
            ValidationError::InvalidDays { input } => {
                write!(f, "Please enter a valid number of days (got '{input}')")
            }
            ValidationError::EmptyCart => write!(f, "Please select at least one command"),
            ValidationError::InvalidEmail { input } => {
                write!(f, "'{input}' is not a valid email address")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Returns the trimmed value, or `Missing` if it is blank.
///
/// # Errors
/// Returns `ValidationError::Missing` when the value is empty after trimming.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Missing { field })
    } else {
        Ok(trimmed)
    }
}

/// Minimal shape check: one `@` with text on both sides and a dot in the domain.
///
/// # Errors
/// Returns `Missing` for blank input and `InvalidEmail` for malformed input.
pub fn require_email(value: &str) -> Result<&str, ValidationError> {
    let email = require("email", value)?;
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.contains('@') && domain.contains('.')
        });
    if valid {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail {
            input: email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_trims() {
        assert_eq!(require("prefix", "  !bot  ").unwrap(), "!bot");
        assert_eq!(
            require("prefix", "   "),
            Err(ValidationError::Missing { field: "prefix" })
        );
    }

    #[test]
    fn test_require_email() {
        assert_eq!(require_email("ops@example.com").unwrap(), "ops@example.com");
        assert!(matches!(
            require_email("ops@example"),
            Err(ValidationError::InvalidEmail { .. })
        ));
        assert!(matches!(
            require_email("@example.com"),
            Err(ValidationError::InvalidEmail { .. })
        ));
        assert_eq!(
            require_email(""),
            Err(ValidationError::Missing { field: "email" })
        );
    }
}
