//! Image uploads written to the local uploads directory.

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::ServerConfig;
use crate::constants::uploads::{ALLOWED_EXTENSIONS, URL_PREFIX};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Only image files are allowed (jpeg, jpg, png, gif, svg)")]
    RejectedType,

    #[error("File exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for UploadError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUpload {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct UploadService {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadService {
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.uploads_path),
            max_bytes: config.max_upload_bytes,
        }
    }

    /// Returns the lowercased extension if both the file name and the
    /// declared content type name an accepted image format.
    ///
    /// Without a declared content type the type is guessed from the name.
    pub fn check_type(
        original_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, UploadError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
            .ok_or(UploadError::RejectedType)?;

        let mime = match content_type {
            Some(declared) => declared
                .parse::<mime_guess::Mime>()
                .map_err(|_| UploadError::RejectedType)?,
            None => mime_guess::from_path(original_name).first_or_octet_stream(),
        };

        let subtype = mime.subtype().as_str().to_ascii_lowercase();
        let accepted = mime.type_() == mime_guess::mime::IMAGE
            && ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| subtype.contains(allowed));

        if accepted {
            Ok(extension)
        } else {
            Err(UploadError::RejectedType)
        }
    }

    pub fn check_size(&self, len: usize) -> Result<(), UploadError> {
        if len > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    pub async fn save(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredUpload, UploadError> {
        let extension = Self::check_type(original_name, content_type)?;
        self.check_size(bytes.len())?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }

        let filename = format!(
            "image-{}-{}.{extension}",
            Utc::now().timestamp_millis(),
            rand::random::<u32>()
        );
        let path = self.dir.join(&filename);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        info!(path = %path.display(), size = bytes.len(), "Stored upload");

        Ok(StoredUpload {
            url: format!("{URL_PREFIX}/{filename}"),
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &Path, max_bytes: usize) -> UploadService {
        UploadService::new(&ServerConfig {
            uploads_path: dir.to_string_lossy().into_owned(),
            max_upload_bytes: max_bytes,
            ..ServerConfig::default()
        })
    }

    #[test]
    fn test_check_type_accepts_images() {
        assert_eq!(
            UploadService::check_type("photo.JPG", Some("image/jpeg")).unwrap(),
            "jpg"
        );
        assert_eq!(
            UploadService::check_type("logo.svg", Some("image/svg+xml")).unwrap(),
            "svg"
        );
        assert_eq!(UploadService::check_type("a.png", None).unwrap(), "png");
    }

    #[test]
    fn test_check_type_rejects_mismatch() {
        assert!(matches!(
            UploadService::check_type("notes.txt", Some("text/plain")),
            Err(UploadError::RejectedType)
        ));
        assert!(matches!(
            UploadService::check_type("photo.png", Some("application/pdf")),
            Err(UploadError::RejectedType)
        ));
        assert!(matches!(
            UploadService::check_type("script.exe", Some("image/png")),
            Err(UploadError::RejectedType)
        ));
        assert!(matches!(
            UploadService::check_type("noextension", Some("image/png")),
            Err(UploadError::RejectedType)
        ));
    }

    #[tokio::test]
    async fn test_save_writes_file_with_generated_name() {
        let dir = std::env::temp_dir().join(format!("sitecms-uploads-{}", uuid::Uuid::new_v4()));
        let uploads = service(&dir, 1024);

        let stored = uploads
            .save("cover.png", Some("image/png"), b"\x89PNG fake")
            .await
            .unwrap();

        assert!(stored.filename.starts_with("image-"));
        assert!(stored.filename.ends_with(".png"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.filename));

        let written = fs::read(dir.join(&stored.filename)).await.unwrap();
        assert_eq!(written, b"\x89PNG fake");

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_save_rejects_oversize() {
        let dir = std::env::temp_dir().join(format!("sitecms-uploads-{}", uuid::Uuid::new_v4()));
        let uploads = service(&dir, 4);

        let result = uploads.save("a.gif", Some("image/gif"), b"12345").await;
        assert!(matches!(result, Err(UploadError::TooLarge { limit: 4 })));
        assert!(!dir.exists());
    }
}
