//! Media upload service
//!
//! Menu photos and check-in selfies go to an external unsigned-upload
//! media host (Cloudinary-compatible API). The server validates and
//! forwards the bytes, the host returns a permanent `secure_url` that
//! gets stored on the record.
//!
//! Uploads happen BEFORE the dependent record is written. If the upload
//! fails the whole operation fails and no record is created.

use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// 图片上限 5MB
const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;
/// 视频上限 50MB
const MAX_VIDEO_SIZE: usize = 50 * 1024 * 1024;
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Upload folders on the media host
pub mod folders {
    pub const MENU: &str = "banhmi_menu";
    pub const UPLOADS: &str = "uploads";
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Empty file")]
    Empty,

    #[error("Upload request failed: {0}")]
    Request(String),

    #[error("Media host rejected upload: {0}")]
    Rejected(String),
}

impl From<MediaError> for crate::utils::AppError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::UnsupportedType(_) | MediaError::TooLarge { .. } | MediaError::Empty => {
                crate::utils::AppError::Validation(e.to_string())
            }
            MediaError::Request(_) | MediaError::Rejected(_) => {
                crate::utils::AppError::Upload(e.to_string())
            }
        }
    }
}

/// Media kind, decided from the declared content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_content_type(content_type: &str) -> Result<Self, MediaError> {
        if content_type.starts_with("image/") {
            Ok(Self::Image)
        } else if content_type.starts_with("video/") {
            Ok(Self::Video)
        } else {
            Err(MediaError::UnsupportedType(content_type.to_string()))
        }
    }

    fn size_limit(self) -> usize {
        match self {
            Self::Image => MAX_IMAGE_SIZE,
            Self::Video => MAX_VIDEO_SIZE,
        }
    }
}

/// Successful upload result
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedMedia {
    pub secure_url: String,
    #[serde(default)]
    pub public_id: String,
}

#[derive(Debug, Deserialize)]
struct HostErrorBody {
    error: Option<HostErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct HostErrorMessage {
    message: String,
}

/// Client for the unsigned-upload media host
#[derive(Debug, Clone)]
pub struct MediaUploader {
    client: reqwest::Client,
    endpoint: String,
    preset: String,
}

impl MediaUploader {
    /// `endpoint` is the full upload URL, `preset` the unsigned preset name
    pub fn new(endpoint: String, preset: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint,
            preset,
        }
    }

    /// Validate size and type without touching the network
    pub fn validate(data: &[u8], content_type: &str) -> Result<MediaKind, MediaError> {
        if data.is_empty() {
            return Err(MediaError::Empty);
        }
        let kind = MediaKind::from_content_type(content_type)?;
        let limit = kind.size_limit();
        if data.len() > limit {
            return Err(MediaError::TooLarge {
                size: data.len(),
                limit,
            });
        }
        Ok(kind)
    }

    /// Upload one file and return the hosted URL
    pub async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
        folder: &str,
    ) -> Result<UploadedMedia, MediaError> {
        Self::validate(&data, content_type)?;
        let size = data.len();

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| MediaError::UnsupportedType(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.preset.clone())
            .text("folder", folder.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: HostErrorBody = response.json().await.unwrap_or(HostErrorBody { error: None });
            let message = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            warn!("media host rejected upload of {filename}: {message}");
            return Err(MediaError::Rejected(message));
        }

        let uploaded: UploadedMedia = response
            .json()
            .await
            .map_err(|e| MediaError::Rejected(format!("malformed host response: {e}")))?;

        info!("uploaded {filename} ({size} bytes) -> {}", uploaded.secure_url);
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_over_5mb_is_rejected() {
        let data = vec![0u8; MAX_IMAGE_SIZE + 1];
        let err = MediaUploader::validate(&data, "image/jpeg").unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { .. }));
    }

    #[test]
    fn video_gets_the_larger_limit() {
        let data = vec![0u8; MAX_IMAGE_SIZE + 1];
        assert_eq!(
            MediaUploader::validate(&data, "video/mp4").unwrap(),
            MediaKind::Video
        );
    }

    #[test]
    fn non_media_content_types_are_rejected() {
        let err = MediaUploader::validate(b"%PDF-", "application/pdf").unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedType(_)));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            MediaUploader::validate(&[], "image/png").unwrap_err(),
            MediaError::Empty
        ));
    }
}
