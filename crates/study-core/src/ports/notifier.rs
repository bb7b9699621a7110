//! Delivery of password reset codes

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::User;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetNotifier: Send + Sync {
    async fn send_code(&self, user: &User, otp: i32, expires_at: DateTime<Utc>) -> Result<(), DomainError>;
}
