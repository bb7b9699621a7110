//! Identity of whoever triggered the current operation

use uuid::Uuid;

use super::user::Role;

/// Passed explicitly into write operations; used for audit stamps and permission checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: Option<Uuid>,
    pub role: Option<Role>,
}

impl CallerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id: Some(user_id),
            role: Some(role),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn is(&self, user_id: &Uuid) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }
}
