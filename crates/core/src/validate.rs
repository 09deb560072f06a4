//! Field validation helpers shared by the registration and update paths.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length for short identity fields (names, usernames, tags).
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for free-text fields (situations, descriptions, comments).
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Minimum length for a username.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

/// Validate a username: 3 to 100 characters, ASCII letters, digits, and
/// `._-` separators only.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_NAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(CoreError::Validation(
            "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }
    Ok(())
}

/// Validate that a required text field is non-blank and within `max` bytes.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters"
        )));
    }
    Ok(())
}
