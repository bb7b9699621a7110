//! Password encoding port

use study_security::PasswordService;

use crate::error::DomainError;

pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> Result<String, DomainError>;
    fn matches(&self, raw: &str, encoded: &str) -> Result<bool, DomainError>;
}

/// Argon2id with a random salt per hash
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, DomainError> {
        PasswordService::hash(raw).map_err(|e| DomainError::PasswordHashError(e.to_string()))
    }

    fn matches(&self, raw: &str, encoded: &str) -> Result<bool, DomainError> {
        PasswordService::verify(raw, encoded).map_err(|e| DomainError::PasswordHashError(e.to_string()))
    }
}
