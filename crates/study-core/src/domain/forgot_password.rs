//! One-time password reset code

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use study_shared::types::new_id;

#[derive(Debug, Clone, PartialEq)]
pub struct ForgotPassword {
    pub id: Uuid,
    pub otp: i32,
    pub user_id: Uuid,
    pub expiration_time: DateTime<Utc>,
}

impl ForgotPassword {
    pub fn issue(user_id: Uuid, ttl_seconds: i64) -> Self {
        Self {
            id: new_id(),
            otp: study_security::token::generate_otp(),
            user_id,
            expiration_time: Utc::now() + Duration::seconds(ttl_seconds),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time <= now
    }
}
