//! Object storage port for avatar uploads

use async_trait::async_trait;

use crate::error::DomainError;

/// Uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Fails with `ImageNotFound` unless the bytes decode as a raster image.
    pub fn ensure_decodable(&self) -> Result<(), DomainError> {
        if self.bytes.is_empty() {
            return Err(DomainError::ImageNotFound);
        }
        image::load_from_memory(&self.bytes)
            .map(|_| ())
            .map_err(|_| DomainError::ImageNotFound)
    }
}

/// Metadata returned by the storage provider after a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub original_filename: String,
    pub url: String,
    pub public_id: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, upload: &ImageUpload, folder: &str) -> Result<StoredObject, DomainError>;
    async fn delete(&self, public_id: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::new(2, 2);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_png_is_decodable() {
        let upload = ImageUpload {
            file_name: "avatar.png".into(),
            content_type: Some("image/png".into()),
            bytes: png_bytes(),
        };
        assert!(upload.ensure_decodable().is_ok());
    }

    #[test]
    fn test_text_is_not_an_image() {
        let upload = ImageUpload {
            file_name: "notes.txt".into(),
            content_type: Some("text/plain".into()),
            bytes: b"definitely not pixels".to_vec(),
        };
        assert!(matches!(upload.ensure_decodable(), Err(DomainError::ImageNotFound)));

        let empty = ImageUpload { bytes: Vec::new(), ..upload };
        assert!(matches!(empty.ensure_decodable(), Err(DomainError::ImageNotFound)));
    }
}
