//! Refresh token repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::RefreshToken;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError>;
    /// Atomically drops every token of `token.user_id` and stores `token`
    /// as the only one left
    async fn replace_for_user(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
    /// Returns the number of removed records
    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, DomainError>;
}
