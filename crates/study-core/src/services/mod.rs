//! Domain services (business logic)

pub mod session_service;
pub mod user_service;
pub mod password_reset_service;

pub use session_service::{LoginResult, RefreshResult, SessionService};
pub use user_service::{CreateUser, UpdateUser, UserService};
pub use password_reset_service::PasswordResetService;
