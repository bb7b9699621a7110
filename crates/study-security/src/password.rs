//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

use study_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password must be at least 8 characters")]
    TooShort,
    #[error("Password must be at most 128 characters")]
    TooLong,
    #[error("Password must contain at least one digit, one lowercase letter, one uppercase letter")]
    TooWeak,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// At least one digit, one lowercase and one uppercase letter.
    pub fn check_strength(password: &str) -> Result<(), PasswordError> {
        let len = password.chars().count();
        if len < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_lower = password.chars().any(|c| c.is_lowercase());
        let has_upper = password.chars().any(|c| c.is_uppercase());
        if has_digit && has_lower && has_upper {
            Ok(())
        } else {
            Err(PasswordError::TooWeak)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("Secret123").unwrap();
        assert_ne!(hash, "Secret123");
        assert!(PasswordService::verify("Secret123", &hash).unwrap());
        assert!(!PasswordService::verify("secret123", &hash).unwrap());
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(matches!(
            PasswordService::verify("Secret123", "not-a-phc-string"),
            Err(PasswordError::HashError(_))
        ));
    }

    #[test]
    fn test_strength_rules() {
        assert_eq!(PasswordService::check_strength("Secret123"), Ok(()));
        assert_eq!(PasswordService::check_strength("Se1"), Err(PasswordError::TooShort));
        assert_eq!(PasswordService::check_strength("secret123"), Err(PasswordError::TooWeak));
        assert_eq!(PasswordService::check_strength("SECRET123"), Err(PasswordError::TooWeak));
        assert_eq!(PasswordService::check_strength("SecretOnly"), Err(PasswordError::TooWeak));
    }
}
