// Type definitions and the crate error enum

use chrono::{DateTime, Utc};

/// Suffixes treated as text objects by `latest_text_object`.
pub const TEXT_SUFFIXES: [&str; 2] = [".txt", ".text"];

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

impl ObjectSummary {
    /// Whether the key looks like a plain-text object.
    pub fn is_text(&self) -> bool {
        TEXT_SUFFIXES.iter().any(|suffix| self.key.ends_with(suffix))
    }
}

/// Metadata returned by a head request, without the object body.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ObjectInfo {
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CosError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("token exchange failed: {0}")]
    Auth(String),

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("S3 operation failed: {0}")]
    Sdk(#[from] s3::error::S3Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid response body: {0}")]
    Decode(String),
}

pub type CosResult<T> = std::result::Result<T, CosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_suffix_detection() {
        let txt = ObjectSummary {
            key: "notes/today.txt".to_string(),
            size: 1,
            last_modified: None,
            etag: None,
        };
        let text = ObjectSummary { key: "a.text".to_string(), ..txt.clone() };
        let bin = ObjectSummary { key: "image.png".to_string(), ..txt.clone() };

        assert!(txt.is_text());
        assert!(text.is_text());
        assert!(!bin.is_text());
    }

    #[test]
    fn test_service_error_display() {
        let err = CosError::Service {
            status: 403,
            message: "Access Denied".to_string(),
        };
        assert_eq!(err.to_string(), "storage service error (403): Access Denied");
    }
}
