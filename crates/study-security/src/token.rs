//! Opaque refresh tokens and password-reset codes

use study_shared::constants::{OTP_MAX, OTP_MIN};

/// 32 random bytes, hex encoded
pub fn generate_refresh_token() -> String {
    let token: [u8; 32] = rand::random();
    hex::encode(token)
}

/// Six digit one-time code
pub fn generate_otp() -> i32 {
    use rand::Rng;
    rand::rng().random_range(OTP_MIN..=OTP_MAX)
}
