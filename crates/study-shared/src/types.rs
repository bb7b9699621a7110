//! Common types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EntityId = Uuid;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Audit columns shared by persisted records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<EntityId>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<EntityId>,
}

impl AuditFields {
    pub fn stamp_create(&mut self, by: Option<EntityId>) {
        self.created_at = Utc::now();
        self.created_by = by;
    }

    pub fn stamp_update(&mut self, by: Option<EntityId>) {
        self.updated_at = Some(Utc::now());
        self.updated_by = by;
    }
}

impl Default for AuditFields {
    fn default() -> Self {
        Self {
            created_at: Utc::now(),
            created_by: None,
            updated_at: None,
            updated_by: None,
        }
    }
}
