//! Password reset code delivery

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use study_core::domain::User;
use study_core::error::DomainError;
use study_core::ports::PasswordResetNotifier;
use study_shared::utils::mask_email;

/// Writes reset codes to the log. Meant for development setups without a mail relay.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogResetNotifier;

#[async_trait]
impl PasswordResetNotifier for LogResetNotifier {
    async fn send_code(&self, user: &User, otp: i32, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        info!(
            user_id = %user.id,
            email = %mask_email(&user.email),
            "Password reset code {} valid until {}",
            otp,
            expires_at.to_rfc3339()
        );
        Ok(())
    }
}
