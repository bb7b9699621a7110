//! Request and response bodies

pub mod auth;
pub mod user;

pub use auth::{AuthenticationRequest, AuthenticationResponse, ForgotPasswordRequest, RefreshResponse, ResetPasswordRequest};
pub use user::{ImageDto, RoleQuery, UserDto, UserRequest, UserUpdateRequest};
