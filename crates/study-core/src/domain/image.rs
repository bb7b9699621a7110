//! Avatar image metadata. The bytes live in object storage.

use uuid::Uuid;

use study_shared::types::new_id;

use crate::ports::StoredObject;

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub id: Uuid,
    /// Original file name
    pub name: String,
    pub url: String,
    /// Identifier assigned by the storage provider
    pub storage_id: String,
}

impl From<StoredObject> for Image {
    fn from(stored: StoredObject) -> Self {
        Self {
            id: new_id(),
            name: stored.original_filename,
            url: stored.url,
            storage_id: stored.public_id,
        }
    }
}
