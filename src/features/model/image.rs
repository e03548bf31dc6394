//! Photo input for identification

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::core::file_utils::{format_file_size, image_mime_for_extension, path_extension, MAX_IMAGE_BYTES};
use crate::core::InputError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(InputError::MissingImage.into());
        }
        let size = bytes.len() as u64;
        if size > MAX_IMAGE_BYTES {
            return Err(InputError::ImageTooLarge {
                size: format_file_size(size),
                limit: format_file_size(MAX_IMAGE_BYTES),
            }
            .into());
        }

        Ok(Self {
            bytes,
            mime_type: mime_type.into(),
        })
    }

    /// Read a photo from disk, taking the MIME type from its extension
    pub async fn from_path(path: &Path) -> Result<Self> {
        let ext = path_extension(path);
        let mime_type = image_mime_for_extension(&ext)
            .ok_or_else(|| InputError::UnsupportedImage(ext.clone()))?;

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Could not read image {}", path.display()))?;

        Self::new(bytes, mime_type)
    }

    /// Base64 payload for inline upload
    pub fn encode(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::as_input_error;

    #[test]
    fn test_encode() {
        let image = ImageInput::new(b"leaf".to_vec(), "image/png").unwrap();
        assert_eq!(image.encode(), "bGVhZg==");
        assert_eq!(image.size(), 4);
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = ImageInput::new(Vec::new(), "image/png").unwrap_err();
        assert_eq!(as_input_error(&err), Some(&InputError::MissingImage));
    }

    #[tokio::test]
    async fn test_from_path_detects_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monstera.JPG");
        tokio::fs::write(&path, b"\xFF\xD8\xFF").await.unwrap();

        let image = ImageInput::from_path(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.bytes, b"\xFF\xD8\xFF".to_vec());
    }

    #[tokio::test]
    async fn test_from_path_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();

        let err = ImageInput::from_path(&path).await.unwrap_err();
        assert_eq!(
            as_input_error(&err),
            Some(&InputError::UnsupportedImage("txt".to_string()))
        );
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = ImageInput::from_path(Path::new("/nonexistent/fern.png"))
            .await
            .unwrap_err();
        assert!(as_input_error(&err).is_none());
        assert!(err.to_string().contains("Could not read image"));
    }
}
