//! Password reset code repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::ForgotPassword;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForgotPasswordRepository: Send + Sync {
    async fn create(&self, code: &ForgotPassword) -> Result<ForgotPassword, DomainError>;
    async fn find_by_otp_and_user(&self, otp: i32, user_id: &Uuid) -> Result<Option<ForgotPassword>, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, DomainError>;
}
