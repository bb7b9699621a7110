//! Application-wide constants

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 900;
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 604800;
pub const DEFAULT_OTP_EXPIRY: i64 = 600;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const OTP_MIN: i32 = 100_000;
pub const OTP_MAX: i32 = 999_999;
pub const AVATAR_FOLDER: &str = "avatars";
pub const DEFAULT_SESSION_COOKIE: &str = "study_session";
pub const DEFAULT_REFRESH_COOKIE: &str = "study_refresh";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
