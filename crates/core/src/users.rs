//! Account lifecycle rules: token generation, expiry windows, school email
//! patterns.

use rand::Rng;
use regex::Regex;

use crate::error::CoreError;
use crate::groups::{ACCOUNT_EXTERNAL, ACCOUNT_STUDENT};

/// Activation tokens stay valid for a day.
pub const ACTIVATION_TOKEN_TTL_HOURS: i64 = 24;

/// Password reset tokens stay valid for half a day.
pub const RESET_TOKEN_TTL_HOURS: i64 = 12;

/// Minimum password length accepted on activation and reset.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Length of activation and reset tokens.
pub const TOKEN_LENGTH: usize = 32;

/// Generate a random alphanumeric token of the given length.
pub fn generate_token(length: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validate that a school email pattern is a well-formed regex.
pub fn validate_email_regex(pattern: &str) -> Result<(), CoreError> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| CoreError::Validation(format!("Invalid email regex: {e}")))
}

/// Whether `email` matches a school's email pattern.
pub fn email_matches(pattern: &str, email: &str) -> Result<bool, CoreError> {
    let re = Regex::new(pattern)
        .map_err(|e| CoreError::Internal(format!("Stored email regex is invalid: {e}")))?;
    Ok(re.is_match(email))
}

/// Resolve the account type for a new account.
///
/// An explicit request wins. Otherwise, an address matching the school
/// pattern gets a student account and everything else an external one.
pub fn resolve_account_type(
    requested: Option<&str>,
    matches_school: bool,
) -> &str {
    match requested {
        Some(account_type) => account_type,
        None if matches_school => ACCOUNT_STUDENT,
        None => ACCOUNT_EXTERNAL,
    }
}

/// Display name: `firstname name (nickname)`.
pub fn full_name(firstname: &str, name: &str, nickname: Option<&str>) -> String {
    match nickname {
        Some(nick) if !nick.is_empty() => format!("{firstname} {name} ({nick})"),
        _ => format!("{firstname} {name}"),
    }
}
