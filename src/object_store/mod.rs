//! Object storage abstraction.
//!
//! Buckets and keys over either a local directory tree or an
//! S3-compatible HTTP gateway. Callers that probe for existence need
//! "not found" kept apart from every other failure, so the error type
//! carries it as its own variant.

pub mod fs;
pub mod http;

pub use fs::FsObjectStore;
pub use http::HttpObjectStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ObjectStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError>;

    /// Existence check; succeeds iff the object is present.
    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError>;
}

/// `s3://bucket/key` URI for an object.
pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}

/// Split an object URI into `(bucket, key)`.
///
/// Accepts both `s3://bucket/key` and path-style
/// `http(s)://host/bucket/key` — the transcription service reports its
/// result location in the latter form.
pub fn parse_object_uri(uri: &str) -> anyhow::Result<(String, String)> {
    let rest = uri
        .strip_prefix("s3://")
        .or_else(|| {
            uri.strip_prefix("https://")
                .or_else(|| uri.strip_prefix("http://"))
                // Path-style: the first segment is the host
                .and_then(|r| r.split_once('/').map(|(_, rest)| rest))
        })
        .ok_or_else(|| anyhow::anyhow!("Unsupported object URI: {}", uri))?;

    let (bucket, key) = rest
        .split_once('/')
        .ok_or_else(|| anyhow::anyhow!("Object URI has no key: {}", uri))?;

    if bucket.is_empty() || key.is_empty() {
        anyhow::bail!("Object URI has an empty bucket or key: {}", uri);
    }

    Ok((bucket.to_string(), key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_uri() {
        assert_eq!(
            object_uri("media", "video/m1/composited-video/p1.mp4"),
            "s3://media/video/m1/composited-video/p1.mp4"
        );
    }

    #[test]
    fn test_parse_s3_uri() {
        let (bucket, key) = parse_object_uri("s3://media/video/m1/p1.mp4").unwrap();
        assert_eq!(bucket, "media");
        assert_eq!(key, "video/m1/p1.mp4");
    }

    #[test]
    fn test_parse_path_style_https_uri() {
        let (bucket, key) =
            parse_object_uri("https://storage.example.com/transcripts/m1/p1.mp4.json").unwrap();
        assert_eq!(bucket, "transcripts");
        assert_eq!(key, "m1/p1.mp4.json");
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(parse_object_uri("ftp://media/key").is_err());
        assert!(parse_object_uri("s3://bucket-only").is_err());
        assert!(parse_object_uri("s3:///key").is_err());
    }
}
