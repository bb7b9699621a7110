//! Authentication payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::{validate_password, UserDto};

#[derive(Debug, Deserialize, Validate)]
pub struct AuthenticationRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Missing password"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Seconds until the access token expires
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(range(min = 100000, max = 999999, message = "Code must have 6 digits"))]
    pub otp: i32,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub repeat_password: String,
}
