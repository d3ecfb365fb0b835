//! Common validation helpers for use cases.

use grimoire_domain::DomainError;

/// Validation error type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field_name} cannot be empty")]
    Empty { field_name: &'static str },

    #[error("{field_name} exceeds maximum length of {max}")]
    TooLong { field_name: &'static str, max: usize },

    #[error("{field_name} is invalid: {reason}")]
    Invalid {
        field_name: &'static str,
        reason: String,
    },

    /// A domain type refused the value.
    #[error("{0}")]
    Rejected(String),
}

impl From<DomainError> for ValidationError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(message) | DomainError::Parse(message) => {
                Self::Rejected(message)
            }
            other => Self::Rejected(other.to_string()),
        }
    }
}

/// Validate a string is non-empty after trimming.
pub fn require_non_empty(value: &str, field_name: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field_name });
    }
    Ok(())
}

/// Validate a string doesn't exceed `max` characters.
pub fn require_max_length(
    value: &str,
    max: usize,
    field_name: &'static str,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field_name, max });
    }
    Ok(())
}

/// Validate a level is within `min..=max`.
pub fn require_level(
    value: u8,
    min: u8,
    max: u8,
    field_name: &'static str,
) -> Result<u8, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::Invalid {
            field_name,
            reason: format!("must be between {} and {}", min, max),
        });
    }
    Ok(value)
}
