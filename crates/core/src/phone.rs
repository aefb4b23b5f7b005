//! Indonesian phone number validation.
//!
//! Visitor registration and public ticket submission accept mobile numbers
//! in either local (`08xxxxxxxxxx`) or international (`+628xxxxxxxxxx`)
//! form. Numbers are normalized to the local form before storage so that
//! lookups and exports are consistent.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// `08` followed by 8 to 11 digits, or `+628` followed by 8 to 11 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(08\d{8,11}|\+628\d{8,11})$").unwrap());

/// Whether `input` is an acceptable Indonesian mobile number.
pub fn is_valid_phone(input: &str) -> bool {
    PHONE_RE.is_match(input)
}

/// Validate and normalize a phone number to local `08...` form.
///
/// Returns `CoreError::Validation` when the pattern does not match.
pub fn normalize_phone(input: &str) -> Result<String, CoreError> {
    let trimmed = input.trim();
    if !is_valid_phone(trimmed) {
        return Err(CoreError::Validation(format!(
            "Invalid phone number '{trimmed}' (expected 08xxxxxxxxxx or +628xxxxxxxxxx)"
        )));
    }
    if let Some(rest) = trimmed.strip_prefix("+62") {
        Ok(format!("0{rest}"))
    } else {
        Ok(trimmed.to_string())
    }
}
