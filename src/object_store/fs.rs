//! Directory-backed object store.
//!
//! Buckets map to directories under a configured root and keys to
//! relative paths below them. Content types have no filesystem
//! representation and are accepted but not recorded.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{ObjectStore, ObjectStoreError};

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).context("Failed to create object store root")?;
        Ok(Self { root })
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }

    fn not_found(bucket: &str, key: &str) -> ObjectStoreError {
        ObjectStoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let path = self.object_path(bucket, key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Self::not_found(bucket, key))
            }
            Err(e) => Err(anyhow::Error::from(e)
                .context(format!("Failed to read object {:?}", path))
                .into()),
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create object directory {:?}", parent))?;
        }

        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write object {:?}", path))?;

        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        let path = self.object_path(bucket, key);
        match tokio::fs::metadata(&path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Self::not_found(bucket, key))
            }
            Err(e) => Err(anyhow::Error::from(e)
                .context(format!("Failed to stat object {:?}", path))
                .into()),
        }
    }
}
