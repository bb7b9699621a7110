//! Repository traits (ports)

pub mod user_repository;
pub mod refresh_token_repository;
pub mod forgot_password_repository;

pub use user_repository::UserRepository;
pub use refresh_token_repository::RefreshTokenRepository;
pub use forgot_password_repository::ForgotPasswordRepository;

#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use refresh_token_repository::MockRefreshTokenRepository;
#[cfg(test)]
pub use forgot_password_repository::MockForgotPasswordRepository;
