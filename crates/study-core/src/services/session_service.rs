// ============================================================================
// Study Core - Session Service
// File: crates/study-core/src/services/session_service.rs
// ============================================================================
//! Login, session-token refresh, signout and current-profile lookup

use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use study_security::JwtService;
use study_shared::utils::mask_email;

use crate::domain::{RefreshToken, User};
use crate::error::DomainError;
use crate::ports::PasswordEncoder;
use crate::repositories::{RefreshTokenRepository, UserRepository};

/// Issues signed session tokens and tracks refresh tokens server-side
pub struct SessionService {
    user_repo: Arc<dyn UserRepository>,
    refresh_repo: Arc<dyn RefreshTokenRepository>,
    encoder: Arc<dyn PasswordEncoder>,
    jwt: Arc<JwtService>,
    refresh_token_expiry: i64,
}

impl SessionService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_repo: Arc<dyn RefreshTokenRepository>,
        encoder: Arc<dyn PasswordEncoder>,
        jwt: Arc<JwtService>,
        refresh_token_expiry: i64,
    ) -> Self {
        Self {
            user_repo,
            refresh_repo,
            encoder,
            jwt,
            refresh_token_expiry,
        }
    }

    /// Login with email and password
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResult, DomainError> {
        info!("Login attempt for email: {}", mask_email(email));

        // 1. Find user by email
        let user = self.user_repo.find_by_email(email).await?
            .ok_or_else(|| {
                warn!("Login failed: email not found: {}", mask_email(email));
                DomainError::InvalidCredentials
            })?;

        // 2. Verify password
        if !self.encoder.matches(password, &user.password)? {
            warn!("Login failed: invalid password for: {}", mask_email(email));
            return Err(DomainError::InvalidCredentials);
        }

        // 3. Check if user can login
        if !user.enabled {
            warn!("Login failed: user {} is disabled", user.id);
            return Err(DomainError::UserDisabled);
        }

        // 4. Replace any refresh token the user still holds
        let refresh_token = self.refresh_repo
            .replace_for_user(&RefreshToken::issue(user.id, self.refresh_token_expiry))
            .await?;

        // 5. Sign the session token
        let session_token = self.issue_session_token(&user)?;

        info!("Login successful for user {}", user.id);

        Ok(LoginResult {
            user,
            session_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new session token.
    ///
    /// An empty or missing value is rejected before storage is consulted.
    /// Expired records are deleted as they are encountered.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<RefreshResult, DomainError> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(DomainError::TokenMissing)?;

        let record = self.refresh_repo.find_by_token(token).await?
            .ok_or_else(|| {
                warn!("Refresh failed: token is not in database");
                DomainError::TokenNotFound
            })?;

        if record.is_expired(Utc::now()) {
            warn!("Refresh failed: token for user {} expired at {}", record.user_id, record.expiry_date);
            self.refresh_repo.delete(&record.id).await?;
            return Err(DomainError::TokenExpired);
        }

        let user = self.user_repo.find_by_id(&record.user_id).await?
            .ok_or(DomainError::UserNotFound)?;

        if !user.enabled {
            return Err(DomainError::UserDisabled);
        }

        let session_token = self.issue_session_token(&user)?;
        info!("Session refreshed for user {}", user.id);

        Ok(RefreshResult {
            user_id: user.id,
            session_token,
        })
    }

    /// Drops the server record of the refresh token, if the client still had one.
    /// Clearing cookies is the caller's job.
    pub async fn signout(&self, refresh_token: Option<&str>) -> Result<(), DomainError> {
        let Some(token) = refresh_token.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        if let Some(record) = self.refresh_repo.find_by_token(token).await? {
            self.refresh_repo.delete(&record.id).await?;
            info!("User {} signed out", record.user_id);
        }
        Ok(())
    }

    /// Profile of the authenticated caller
    pub async fn me(&self, user_id: &Uuid) -> Result<User, DomainError> {
        self.user_repo.find_by_id(user_id).await?
            .ok_or(DomainError::UserNotFound)
    }

    /// Seconds a session token stays valid
    pub fn session_token_expiry(&self) -> i64 {
        self.jwt.access_token_expiry()
    }

    /// Seconds a refresh token stays valid
    pub fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }

    fn issue_session_token(&self, user: &User) -> Result<String, DomainError> {
        self.jwt
            .generate_session_token(&user.id, user.role.code())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))
    }
}

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub session_token: String,
    pub refresh_token: RefreshToken,
}

/// Result of a successful refresh
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub user_id: Uuid,
    pub session_token: String,
}
