//! User payloads

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use study_core::domain::{Image, User};
use study_core::services::{CreateUser, UpdateUser};
use study_security::PasswordService;

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{4,15}$").expect("phone pattern compiles")
});

pub(crate) fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_PATTERN.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message(Cow::Borrowed("Invalid phone number")))
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), ValidationError> {
    PasswordService::check_strength(password)
        .map_err(|e| ValidationError::new("password").with_message(Cow::Owned(e.to_string())))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Missing user full name"))]
    pub full_name: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(range(min = 0, max = 1, message = "Value must be 0 or 1"))]
    pub enable: i32,
    #[validate(range(min = 0, max = 2, message = "Role must be between 0 and 2"))]
    pub role: i32,
}

impl From<UserRequest> for CreateUser {
    fn from(request: UserRequest) -> Self {
        CreateUser {
            email: request.email,
            phone: request.phone,
            full_name: request.full_name,
            password: request.password,
            enable: request.enable,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserUpdateRequest {
    #[validate(length(min = 1, message = "Missing user full name"))]
    pub full_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

impl From<UserUpdateRequest> for UpdateUser {
    fn from(request: UserUpdateRequest) -> Self {
        UpdateUser {
            full_name: request.full_name,
            phone: request.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: i32,
}

#[derive(Debug, Serialize)]
pub struct ImageDto {
    pub name: String,
    pub url: String,
}

impl From<&Image> for ImageDto {
    fn from(image: &Image) -> Self {
        Self {
            name: image.name.clone(),
            url: image.url.clone(),
        }
    }
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub enabled: bool,
    pub role: i16,
    pub role_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<ImageDto>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            full_name: user.full_name.clone(),
            enabled: user.enabled,
            role: user.role.code(),
            role_name: user.role.as_str(),
            avatar: user.avatar.as_ref().map(ImageDto::from),
            created_at: user.audit.created_at.to_rfc3339(),
            updated_at: user.audit.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UserRequest {
        UserRequest {
            email: "a@x.com".into(),
            phone: "+1555".into(),
            full_name: "Ada".into(),
            password: "Secret123".into(),
            enable: 1,
            role: 1,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_invalid_fields() {
        let bad_phone = UserRequest { phone: "12ab".into(), ..request() };
        assert!(bad_phone.validate().unwrap_err().field_errors().contains_key("phone"));

        let weak = UserRequest { password: "password".into(), ..request() };
        assert!(weak.validate().unwrap_err().field_errors().contains_key("password"));

        let bad_role = UserRequest { role: 3, ..request() };
        assert!(bad_role.validate().unwrap_err().field_errors().contains_key("role"));

        let bad_flag = UserRequest { enable: 2, ..request() };
        assert!(bad_flag.validate().unwrap_err().field_errors().contains_key("enable"));

        let bad_email = UserRequest { email: "nope".into(), ..request() };
        assert!(bad_email.validate().unwrap_err().field_errors().contains_key("email"));
    }
}
