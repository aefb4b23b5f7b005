//! Password hashing with Argon2id.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{AppError, AppResult};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password with Argon2id using default parameters.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::InternalError(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored hash. Returns `false` for a wrong
/// password and an error only if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::InternalError(format!("malformed password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Minimal strength check applied when creating users or resetting passwords.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err("password must contain a letter".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("password must contain a digit".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct horse 1").unwrap();
        assert!(verify_password("correct horse 1", &hash).unwrap());
        assert!(!verify_password("wrong password 2", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same password 1").unwrap();
        let b = hash_password("same password 1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn strength_rules() {
        assert!(validate_password_strength("a1").is_err());
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("abcdefgh").is_err());
        assert!(validate_password_strength("abcdefg1").is_ok());
    }
}
