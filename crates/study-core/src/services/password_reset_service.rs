//! Forgot-password flow: issue a one-time code, redeem it for a new password

use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

use study_shared::utils::mask_email;

use crate::domain::ForgotPassword;
use crate::error::DomainError;
use crate::ports::{PasswordEncoder, PasswordResetNotifier};
use crate::repositories::{ForgotPasswordRepository, RefreshTokenRepository, UserRepository};

pub struct PasswordResetService {
    user_repo: Arc<dyn UserRepository>,
    code_repo: Arc<dyn ForgotPasswordRepository>,
    refresh_repo: Arc<dyn RefreshTokenRepository>,
    encoder: Arc<dyn PasswordEncoder>,
    notifier: Arc<dyn PasswordResetNotifier>,
    otp_expiry: i64,
}

impl PasswordResetService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        code_repo: Arc<dyn ForgotPasswordRepository>,
        refresh_repo: Arc<dyn RefreshTokenRepository>,
        encoder: Arc<dyn PasswordEncoder>,
        notifier: Arc<dyn PasswordResetNotifier>,
        otp_expiry: i64,
    ) -> Self {
        Self {
            user_repo,
            code_repo,
            refresh_repo,
            encoder,
            notifier,
            otp_expiry,
        }
    }

    /// Replace any outstanding code of the user with a fresh one and deliver it
    pub async fn request_reset(&self, email: &str) -> Result<(), DomainError> {
        let user = self.user_repo.find_by_email(email).await?
            .ok_or_else(|| {
                warn!("Password reset requested for unknown email: {}", mask_email(email));
                DomainError::UserNotFound
            })?;

        self.code_repo.delete_by_user(&user.id).await?;
        let code = self.code_repo
            .create(&ForgotPassword::issue(user.id, self.otp_expiry))
            .await?;

        self.notifier.send_code(&user, code.otp, code.expiration_time).await?;
        info!("Password reset code issued for user {}", user.id);
        Ok(())
    }

    /// Redeem `otp` and store `new_password`. The code is single use; every
    /// refresh token of the user is revoked on success.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: i32,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let mut user = self.user_repo.find_by_email(email).await?
            .ok_or(DomainError::UserNotFound)?;

        let code = self.code_repo.find_by_otp_and_user(otp, &user.id).await?
            .ok_or_else(|| {
                warn!("Invalid reset code for user {}", user.id);
                DomainError::OtpInvalid
            })?;

        if code.is_expired(Utc::now()) {
            self.code_repo.delete(&code.id).await?;
            warn!("Expired reset code for user {}", user.id);
            return Err(DomainError::OtpExpired);
        }

        user.password = self.encoder.encode(new_password)?;
        user.audit.stamp_update(Some(user.id));
        self.user_repo.update(&user).await?;

        self.code_repo.delete(&code.id).await?;
        let revoked = self.refresh_repo.delete_by_user(&user.id).await?;
        info!("Password reset for user {} ({} session(s) revoked)", user.id, revoked);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::domain::{Role, User};
    use crate::ports::MockPasswordResetNotifier;
    use crate::repositories::{
        MockForgotPasswordRepository, MockRefreshTokenRepository, MockUserRepository,
    };

    struct PlainEncoder;

    impl PasswordEncoder for PlainEncoder {
        fn encode(&self, raw: &str) -> Result<String, DomainError> {
            Ok(format!("enc:{raw}"))
        }

        fn matches(&self, raw: &str, encoded: &str) -> Result<bool, DomainError> {
            Ok(encoded == format!("enc:{raw}"))
        }
    }

    fn user() -> User {
        User::new(
            "a@x.com".into(),
            "+1555".into(),
            "Ada".into(),
            "enc:Secret123".into(),
            true,
            Role::Student,
        )
    }

    fn service(
        users: MockUserRepository,
        codes: MockForgotPasswordRepository,
        tokens: MockRefreshTokenRepository,
        notifier: MockPasswordResetNotifier,
    ) -> PasswordResetService {
        PasswordResetService::new(
            Arc::new(users),
            Arc::new(codes),
            Arc::new(tokens),
            Arc::new(PlainEncoder),
            Arc::new(notifier),
            600,
        )
    }

    #[tokio::test]
    async fn test_request_reset_sends_fresh_code() {
        let stored = user();
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| Ok(Some(stored.clone())));

        let mut codes = MockForgotPasswordRepository::new();
        codes.expect_delete_by_user().times(1).returning(|_| Ok(0));
        codes.expect_create().times(1).returning(|c| Ok(c.clone()));

        let mut notifier = MockPasswordResetNotifier::new();
        notifier
            .expect_send_code()
            .withf(|_, otp, _| (100_000..=999_999).contains(otp))
            .times(1)
            .returning(|_, _, _| Ok(()));

        service(users, codes, MockRefreshTokenRepository::new(), notifier)
            .request_reset("a@x.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_request_reset_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut notifier = MockPasswordResetNotifier::new();
        notifier.expect_send_code().never();

        let err = service(users, MockForgotPasswordRepository::new(), MockRefreshTokenRepository::new(), notifier)
            .request_reset("ghost@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));
    }

    #[tokio::test]
    async fn test_reset_password_consumes_code() {
        let stored = user();
        let code = ForgotPassword::issue(stored.id, 600);
        let code_id = code.id;
        let otp = code.otp;

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| Ok(Some(stored.clone())));
        users
            .expect_update()
            .withf(|u| u.password == "enc:NewSecret9")
            .times(1)
            .returning(|u| Ok(u.clone()));

        let mut codes = MockForgotPasswordRepository::new();
        codes.expect_find_by_otp_and_user().returning(move |_, _| Ok(Some(code.clone())));
        codes
            .expect_delete()
            .withf(move |id| *id == code_id)
            .times(1)
            .returning(|_| Ok(()));

        let mut tokens = MockRefreshTokenRepository::new();
        tokens.expect_delete_by_user().times(1).returning(|_| Ok(2));

        service(users, codes, tokens, MockPasswordResetNotifier::new())
            .reset_password("a@x.com", otp, "NewSecret9")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_expired_code() {
        let stored = user();
        let mut code = ForgotPassword::issue(stored.id, 600);
        code.expiration_time = Utc::now() - Duration::seconds(5);
        let otp = code.otp;

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| Ok(Some(stored.clone())));
        users.expect_update().never();

        let mut codes = MockForgotPasswordRepository::new();
        codes.expect_find_by_otp_and_user().returning(move |_, _| Ok(Some(code.clone())));
        codes.expect_delete().times(1).returning(|_| Ok(()));

        let err = service(users, codes, MockRefreshTokenRepository::new(), MockPasswordResetNotifier::new())
            .reset_password("a@x.com", otp, "NewSecret9")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OtpExpired));
    }

    #[tokio::test]
    async fn test_reset_password_wrong_code() {
        let stored = user();
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| Ok(Some(stored.clone())));
        users.expect_update().never();

        let mut codes = MockForgotPasswordRepository::new();
        codes.expect_find_by_otp_and_user().returning(|_, _| Ok(None));

        let err = service(users, codes, MockRefreshTokenRepository::new(), MockPasswordResetNotifier::new())
            .reset_password("a@x.com", 123_456, "NewSecret9")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OtpInvalid));
    }
}
