// ============================================================================
// Study Core - User Entity
// File: crates/study-core/src/domain/user.rs
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use study_shared::types::{new_id, AuditFields};

use super::image::Image;

/// Closed set of account roles, persisted as their integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Teacher,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Student, Role::Teacher];

    pub fn code(&self) -> i16 {
        match self {
            Role::Admin => 0,
            Role::Student => 1,
            Role::Teacher => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Role::Admin),
            1 => Some(Role::Student),
            2 => Some(Role::Teacher),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

/// The `enable` request flag: 1 is active, anything else is disabled.
pub fn enabled_from_flag(flag: i32) -> bool {
    flag == 1
}

/// User account. `password` always holds the encoded hash, never the raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub password: String,
    pub enabled: bool,
    pub role: Role,
    pub avatar: Option<Image>,
    pub audit: AuditFields,
}

impl User {
    pub fn new(
        email: String,
        phone: String,
        full_name: String,
        password_hash: String,
        enabled: bool,
        role: Role,
    ) -> Self {
        Self {
            id: new_id(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            full_name: full_name.trim().to_string(),
            password: password_hash,
            enabled,
            role,
            avatar: None,
            audit: AuditFields::default(),
        }
    }

    pub fn apply_profile(&mut self, full_name: String, phone: String) {
        self.full_name = full_name.trim().to_string();
        self.phone = phone.trim().to_string();
    }
}
