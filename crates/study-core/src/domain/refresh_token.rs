//! Server-side refresh token record

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use study_shared::types::new_id;

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshToken {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expiry_date: DateTime<Utc>,
}

impl RefreshToken {
    /// Issue a fresh opaque token for `user_id` valid for `ttl_seconds`
    pub fn issue(user_id: Uuid, ttl_seconds: i64) -> Self {
        Self {
            id: new_id(),
            token: study_security::token::generate_refresh_token(),
            user_id,
            expiry_date: Utc::now() + Duration::seconds(ttl_seconds),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let token = RefreshToken::issue(Uuid::new_v4(), 60);
        assert!(!token.is_expired(Utc::now()));
        assert!(token.is_expired(Utc::now() + Duration::seconds(61)));
    }
}
