//! Input shape validation for API handlers.
//!
//! Validation happens before any backend call; a rejected input must cause
//! zero mutations.

use chrono::NaiveDate;

use crate::error::SparkError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Parse a strict `YYYY-MM-DD` date.
///
/// The shape is checked byte-for-byte (exactly ten characters, dashes at
/// positions 4 and 7, digits elsewhere) before calendar validation, so
/// `24-01-01` fails on shape and `2024-13-40` fails on the calendar.
pub fn parse_due_date(s: &str) -> Result<NaiveDate, SparkError> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });

    if !shape_ok {
        return Err(SparkError::Validation(format!(
            "due date must match YYYY-MM-DD, got '{s}'"
        )));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| SparkError::Validation(format!("'{s}' is not a valid calendar date")))
}

/// Shape-check an email address. The backend is authoritative; this only
/// rejects obviously malformed input before a network call.
pub fn validate_email(email: &str) -> Result<(), SparkError> {
    let trimmed = email.trim();
    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !valid {
        return Err(SparkError::Validation("invalid email address".to_string()));
    }
    Ok(())
}

/// Enforce the minimum password length.
pub fn validate_password(password: &str) -> Result<(), SparkError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(SparkError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
