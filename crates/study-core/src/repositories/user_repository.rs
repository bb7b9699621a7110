//! User repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Role, User};
use crate::error::DomainError;

/// `create` and `update` persist the user row together with its avatar row atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError>;
    /// Case-insensitive
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    /// Raw equality, no normalization
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_role(&self, role: Role) -> Result<Vec<User>, DomainError>;
    async fn create(&self, user: &User) -> Result<User, DomainError>;
    async fn update(&self, user: &User) -> Result<User, DomainError>;
}
