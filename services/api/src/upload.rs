//! Image upload collaborator.
//!
//! # Purpose
//! The service only needs "bytes in, public URL out"; where the bytes land
//! is a deployment concern behind [`ObjectStoreUploader`]. The bundled
//! implementation writes to a local media directory that the router serves
//! statically.
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

pub const ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("image exceeds {MAX_IMAGE_BYTES} bytes")]
    TooLarge,
    #[error("object store write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub url: String,
}

#[async_trait]
pub trait ObjectStoreUploader: Send + Sync {
    async fn upload(&self, bytes: Bytes, content_type: &str) -> Result<UploadedImage, UploadError>;
}

/// Writes images into a local directory and returns URLs under a configured
/// public base path.
pub struct LocalDiskUploader {
    root: PathBuf,
    public_base: String,
}

impl LocalDiskUploader {
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Self {
        Self {
            root,
            public_base: public_base.into(),
        }
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[async_trait]
impl ObjectStoreUploader for LocalDiskUploader {
    async fn upload(&self, bytes: Bytes, content_type: &str) -> Result<UploadedImage, UploadError> {
        let Some(extension) = extension_for(content_type) else {
            return Err(UploadError::UnsupportedContentType(content_type.to_string()));
        };
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge);
        }

        let file_name = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&file_name), &bytes).await?;

        Ok(UploadedImage {
            url: format!("{}/{file_name}", self.public_base.trim_end_matches('/')),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let uploader = LocalDiskUploader::new(dir.path().to_path_buf(), "/media");

        let uploaded = uploader
            .upload(Bytes::from_static(b"not really a png"), "image/png")
            .await
            .expect("upload");

        assert!(uploaded.url.starts_with("/media/"));
        assert!(uploaded.url.ends_with(".png"));
        let file_name = uploaded.url.rsplit('/').next().expect("file name");
        let written = std::fs::read(dir.path().join(file_name)).expect("file");
        assert_eq!(written, b"not really a png");
    }

    #[tokio::test]
    async fn unsupported_content_type_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let uploader = LocalDiskUploader::new(dir.path().to_path_buf(), "/media");
        let err = uploader
            .upload(Bytes::from_static(b"pdf"), "application/pdf")
            .await
            .expect_err("rejected");
        assert!(matches!(err, UploadError::UnsupportedContentType(_)));
    }

    #[tokio::test]
    async fn oversized_payload_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let uploader = LocalDiskUploader::new(dir.path().to_path_buf(), "/media");
        let big = Bytes::from(vec![0u8; MAX_IMAGE_BYTES + 1]);
        let err = uploader
            .upload(big, "image/png")
            .await
            .expect_err("rejected");
        assert!(matches!(err, UploadError::TooLarge));
    }
}
