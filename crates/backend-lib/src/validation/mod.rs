// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation applied before a roster is changed.
//!
//! Email format is not checked; any non-blank string is accepted.
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 path limit

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a student email
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.trim().is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email must not be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    Ok(email)
}
