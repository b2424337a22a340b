//! Password hashing (Argon2id, PHC strings) and the password policy.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use bimbingan_core::error::CoreError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Upper bound so hashing cost stays predictable.
pub const MAX_PASSWORD_LENGTH: usize = 128;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on mismatch; `Err` only when `hash` is not a PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// New passwords need 8 to 128 characters with at least one letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        )));
    }
    if !password.chars().any(char::is_alphabetic) || !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "Password must contain at least one letter and one digit".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("skripsi-2024").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("skripsi-2024", &hash).expect("verify should succeed"));
        assert!(!verify_password("skripsi-2025", &hash).expect("verify should succeed"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn length_bounds() {
        assert_matches!(
            validate_password_strength("abc1234"),
            Err(CoreError::Validation(msg)) if msg.contains("at least 8")
        );
        assert!(validate_password_strength("abcd1234").is_ok());
        assert!(validate_password_strength(&format!("a1{}", "x".repeat(MAX_PASSWORD_LENGTH))).is_err());
    }

    #[test]
    fn needs_letter_and_digit() {
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("password").is_err());
        assert!(validate_password_strength("kata-sandi-9").is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Eight characters, more than eight bytes.
        assert!(validate_password_strength("pässwör1").is_ok());
    }
}
