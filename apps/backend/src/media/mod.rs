//! Hosted image storage behind a trait, so handlers and tests do not care
//! whether Cloudinary is configured.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::app::MediaCredentials;

pub mod cloudinary;

pub use cloudinary::CloudinaryMediaHost;

/// Where uploaded book covers are stored.
pub const BOOKS_FOLDER: &str = "bookstore/books";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media host not configured")]
    NotConfigured,
    #[error("media host unreachable: {0}")]
    Transport(String),
    #[error("media host rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("unexpected media host response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload `source` (a data URI or remote URL) into `folder`.
    async fn upload(&self, source: &str, folder: &str) -> Result<UploadedMedia, MediaError>;

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;

    /// Whether `url` points at an asset this host can delete.
    fn owns_url(&self, url: &str) -> bool;
}

/// Stand-in used when no credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredMediaHost;

#[async_trait]
impl MediaHost for UnconfiguredMediaHost {
    async fn upload(&self, _source: &str, _folder: &str) -> Result<UploadedMedia, MediaError> {
        Err(MediaError::NotConfigured)
    }

    async fn destroy(&self, _public_id: &str) -> Result<(), MediaError> {
        Err(MediaError::NotConfigured)
    }

    fn owns_url(&self, _url: &str) -> bool {
        false
    }
}

pub fn media_host_from_config(credentials: Option<&MediaCredentials>) -> Arc<dyn MediaHost> {
    match credentials {
        Some(c) => Arc::new(CloudinaryMediaHost::new(c.clone())),
        None => Arc::new(UnconfiguredMediaHost),
    }
}

/// Public id of a hosted asset from its delivery URL.
///
/// Everything after `/upload/` (and an optional `v<digits>/` version
/// segment) minus the file extension. URLs without an `/upload/` marker
/// fall back to the last two path segments.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);

    let tail = match path.split_once("/upload/") {
        Some((_, rest)) => match rest.split_once('/') {
            Some((version, after))
                if version.len() > 1
                    && version.starts_with('v')
                    && version[1..].chars().all(|c| c.is_ascii_digit()) =>
            {
                after.to_string()
            }
            _ => rest.to_string(),
        },
        None => {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            if segments.len() < 2 {
                return None;
            }
            segments[segments.len() - 2..].join("/")
        }
    };

    let id = match tail.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => tail.as_str(),
    };

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_from_versioned_delivery_url() {
        assert_eq!(
            public_id_from_url(
                "https://res.cloudinary.com/demo/image/upload/v1712345678/bookstore/books/abc123.jpg"
            )
            .as_deref(),
            Some("bookstore/books/abc123")
        );
    }

    #[test]
    fn test_public_id_without_version() {
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/bookstore/books/x.png?a=1")
                .as_deref(),
            Some("bookstore/books/x")
        );
    }

    #[test]
    fn test_public_id_fallback_uses_last_two_segments() {
        assert_eq!(
            public_id_from_url("https://cdn.example.test/covers/dune.webp").as_deref(),
            Some("covers/dune")
        );
        assert_eq!(public_id_from_url("dune.webp"), None);
        assert_eq!(public_id_from_url(""), None);
    }

    #[tokio::test]
    async fn test_unconfigured_host_refuses_everything() {
        let host = UnconfiguredMediaHost;
        assert!(matches!(
            host.upload("data:image/png;base64,AAAA", BOOKS_FOLDER).await,
            Err(MediaError::NotConfigured)
        ));
        assert!(matches!(
            host.destroy("bookstore/books/x").await,
            Err(MediaError::NotConfigured)
        ));
        assert!(!host.owns_url("https://res.cloudinary.com/demo/image/upload/x.png"));
    }
}
