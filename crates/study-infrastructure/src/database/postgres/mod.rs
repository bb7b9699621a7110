//! PostgreSQL repository implementations

pub mod user_repo_impl;
pub mod refresh_token_repo_impl;
pub mod forgot_password_repo_impl;

pub use user_repo_impl::PgUserRepository;
pub use refresh_token_repo_impl::PgRefreshTokenRepository;
pub use forgot_password_repo_impl::PgForgotPasswordRepository;

use study_core::error::DomainError;
use tracing::error;

pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}
