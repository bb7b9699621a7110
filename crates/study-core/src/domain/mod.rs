//! # Study Core - Domain Module
//! 
//! Domain entities for the StudyApp backend.

pub mod user;
pub mod image;
pub mod refresh_token;
pub mod forgot_password;
pub mod caller;

// Re-export all entities and enums
pub use user::{User, Role};
pub use image::Image;
pub use refresh_token::RefreshToken;
pub use forgot_password::ForgotPassword;
pub use caller::CallerContext;
