//! Filesystem-backed object storage. Objects are served from `public_base_url`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use study_core::error::DomainError;
use study_core::ports::{ImageUpload, ObjectStorage, StoredObject};

pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public ids are relative paths under `root`; anything escaping it is refused.
    fn resolve(&self, public_id: &str) -> Result<PathBuf, DomainError> {
        let relative = Path::new(public_id);
        let safe = !public_id.is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(DomainError::StorageError(format!("invalid object id: {public_id}")));
        }
        Ok(self.root.join(relative))
    }
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, upload: &ImageUpload, folder: &str) -> Result<StoredObject, DomainError> {
        let public_id = format!("{}/{}.{}", folder, Uuid::new_v4(), extension_of(&upload.file_name));
        let path = self.resolve(&public_id)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::StorageError(e.to_string()))?;
        }
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| DomainError::StorageError(e.to_string()))?;

        info!("Stored object {} ({} bytes)", public_id, upload.bytes.len());

        Ok(StoredObject {
            original_filename: upload.file_name.clone(),
            url: format!("{}/{}", self.public_base_url, public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), DomainError> {
        let path = self.resolve(public_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Object {} already gone", public_id);
                Ok(())
            }
            Err(e) => Err(DomainError::StorageError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("study-storage-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_upload_then_delete() {
        let root = scratch_dir();
        let storage = LocalObjectStorage::new(&root, "/uploads/");
        let upload = ImageUpload {
            file_name: "Me.PNG".into(),
            content_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        };

        let stored = storage.upload(&upload, "avatars").await.unwrap();
        assert!(stored.public_id.starts_with("avatars/"));
        assert!(stored.public_id.ends_with(".png"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.public_id));
        assert_eq!(stored.original_filename, "Me.PNG");
        assert_eq!(tokio::fs::read(root.join(&stored.public_id)).await.unwrap(), vec![1, 2, 3]);

        storage.delete(&stored.public_id).await.unwrap();
        assert!(!root.join(&stored.public_id).exists());

        // second delete is a no-op
        storage.delete(&stored.public_id).await.unwrap();

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_refuses_escaping_ids() {
        let storage = LocalObjectStorage::new(scratch_dir(), "/uploads");
        assert!(storage.delete("../etc/passwd").await.is_err());
        assert!(storage.delete("/etc/passwd").await.is_err());
        assert!(storage.delete("").await.is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.JPG"), "jpg");
        assert_eq!(extension_of("noext"), "bin");
        assert_eq!(extension_of("weird.p/ng"), "bin");
    }
}
