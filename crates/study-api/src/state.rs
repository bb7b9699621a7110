use std::sync::Arc;

use study_core::ports::{Argon2PasswordEncoder, ObjectStorage, PasswordEncoder, PasswordResetNotifier};
use study_core::repositories::{ForgotPasswordRepository, RefreshTokenRepository, UserRepository};
use study_core::services::{PasswordResetService, SessionService, UserService};
use study_security::JwtService;
use study_shared::config::AppConfig;

/// Persistence adapters the services are built on
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub reset_codes: Arc<dyn ForgotPasswordRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtService>,
    pub sessions: Arc<SessionService>,
    pub users: Arc<UserService>,
    pub password_reset: Arc<PasswordResetService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        repos: Repositories,
        storage: Arc<dyn ObjectStorage>,
        notifier: Arc<dyn PasswordResetNotifier>,
    ) -> Self {
        let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry));
        let encoder: Arc<dyn PasswordEncoder> = Arc::new(Argon2PasswordEncoder);

        let sessions = SessionService::new(
            repos.users.clone(),
            repos.refresh_tokens.clone(),
            encoder.clone(),
            jwt.clone(),
            config.jwt.refresh_token_expiry,
        );
        let users = UserService::new(repos.users.clone(), storage, encoder.clone());
        let password_reset = PasswordResetService::new(
            repos.users,
            repos.reset_codes,
            repos.refresh_tokens,
            encoder,
            notifier,
            config.password_reset.otp_expiry,
        );

        Self {
            config: Arc::new(config),
            jwt,
            sessions: Arc::new(sessions),
            users: Arc::new(users),
            password_reset: Arc::new(password_reset),
        }
    }
}
