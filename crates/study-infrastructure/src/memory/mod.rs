//! In-memory repositories for local development (`database.driver = "memory"`) and tests.
//!
//! They enforce the same uniqueness rules the PostgreSQL schema does.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use study_core::domain::{ForgotPassword, RefreshToken, Role, User};
use study_core::error::DomainError;
use study_core::repositories::{ForgotPasswordRepository, RefreshTokenRepository, UserRepository};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(users: &HashMap<Uuid, User>, candidate: &User) -> Result<(), DomainError> {
        for other in users.values().filter(|u| u.id != candidate.id) {
            if other.email.eq_ignore_ascii_case(&candidate.email) {
                return Err(DomainError::EmailAlreadyExists(candidate.email.clone()));
            }
            if other.phone == candidate.phone {
                return Err(DomainError::PhoneAlreadyExists(candidate.phone.clone()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await
            .values()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self.users.read().await
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.audit.created_at);
        Ok(users)
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, user)?;
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(DomainError::UserNotFound);
        }
        Self::check_unique(&users, user)?;
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct MemoryRefreshTokenRepository {
    tokens: RwLock<HashMap<Uuid, RefreshToken>>,
}

impl MemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        if tokens.values().any(|t| t.token == token.token) {
            return Err(DomainError::DatabaseError("duplicate refresh token".into()));
        }
        tokens.insert(token.id, token.clone());
        Ok(token.clone())
    }

    async fn replace_for_user(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, t| t.user_id != token.user_id);
        tokens.insert(token.id, token.clone());
        Ok(token.clone())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        Ok(self.tokens.read().await
            .values()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        self.tokens.write().await.remove(id);
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != *user_id);
        Ok((before - tokens.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryForgotPasswordRepository {
    codes: RwLock<HashMap<Uuid, ForgotPassword>>,
}

impl MemoryForgotPasswordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ForgotPasswordRepository for MemoryForgotPasswordRepository {
    async fn create(&self, code: &ForgotPassword) -> Result<ForgotPassword, DomainError> {
        self.codes.write().await.insert(code.id, code.clone());
        Ok(code.clone())
    }

    async fn find_by_otp_and_user(&self, otp: i32, user_id: &Uuid) -> Result<Option<ForgotPassword>, DomainError> {
        Ok(self.codes.read().await
            .values()
            .find(|c| c.otp == otp && c.user_id == *user_id)
            .cloned())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        self.codes.write().await.remove(id);
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, DomainError> {
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, c| c.user_id != *user_id);
        Ok((before - codes.len()) as u64)
    }
}
