//! Domain errors

use thiserror::Error;

/// Coarse classification the HTTP layer maps onto status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,
    
    #[error("User is disabled")]
    UserDisabled,
    
    #[error("Invalid credentials")]
    InvalidCredentials,
    
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),
    
    #[error("Phone already exists: {0}")]
    PhoneAlreadyExists(String),
    
    #[error("Image not found or not a valid image")]
    ImageNotFound,
    
    #[error("Invalid role: {0}")]
    InvalidRole(i32),
    
    #[error("Refresh token is empty")]
    TokenMissing,
    
    #[error("Refresh token is not in database")]
    TokenNotFound,
    
    #[error("Refresh token was expired. Please make a new signin request")]
    TokenExpired,
    
    #[error("Invalid one-time code")]
    OtpInvalid,
    
    #[error("One-time code has expired")]
    OtpExpired,
    
    #[error("Forbidden: {0}")]
    Forbidden(String),
    
    #[error("Password hash error: {0}")]
    PasswordHashError(String),
    
    #[error("Token generation error: {0}")]
    TokenGenerationError(String),
    
    #[error("Storage error: {0}")]
    StorageError(String),
    
    #[error("Notification error: {0}")]
    NotificationError(String),
    
    #[error("Database error: {0}")]
    DatabaseError(String),
    
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::UserNotFound => ErrorKind::NotFound,
            DomainError::UserDisabled => ErrorKind::Forbidden,
            DomainError::InvalidCredentials => ErrorKind::Unauthorized,
            DomainError::EmailAlreadyExists(_) => ErrorKind::Conflict,
            DomainError::PhoneAlreadyExists(_) => ErrorKind::Conflict,
            DomainError::ImageNotFound => ErrorKind::BadRequest,
            DomainError::InvalidRole(_) => ErrorKind::BadRequest,
            DomainError::TokenMissing => ErrorKind::BadRequest,
            DomainError::TokenNotFound => ErrorKind::Unauthorized,
            DomainError::TokenExpired => ErrorKind::Unauthorized,
            DomainError::OtpInvalid => ErrorKind::BadRequest,
            DomainError::OtpExpired => ErrorKind::BadRequest,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::StorageError(_)
            | DomainError::NotificationError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::UserNotFound => "USER_NOT_FOUND",
            DomainError::UserDisabled => "USER_DISABLED",
            DomainError::InvalidCredentials => "INVALID_CREDENTIALS",
            DomainError::EmailAlreadyExists(_) => "EMAIL_ALREADY_EXISTED",
            DomainError::PhoneAlreadyExists(_) => "PHONE_ALREADY_EXISTED",
            DomainError::ImageNotFound => "IMAGE_NOT_FOUND",
            DomainError::InvalidRole(_) => "INVALID_ROLE",
            DomainError::TokenMissing => "REFRESH_TOKEN_EMPTY",
            DomainError::TokenNotFound => "REFRESH_TOKEN_NOT_FOUND",
            DomainError::TokenExpired => "REFRESH_TOKEN_EXPIRED",
            DomainError::OtpInvalid => "OTP_INVALID",
            DomainError::OtpExpired => "OTP_EXPIRED",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::StorageError(_)
            | DomainError::NotificationError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}
