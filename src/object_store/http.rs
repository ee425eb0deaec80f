//! HTTP object store client.
//!
//! Talks path-style (`{endpoint}/{bucket}/{key}`) to an S3-compatible
//! gateway with plain GET/PUT/HEAD, optionally authenticated with a
//! bearer token.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{ObjectStore, ObjectStoreError};

pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, key)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn not_found(bucket: &str, key: &str) -> ObjectStoreError {
        ObjectStoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let url = self.object_url(bucket, key);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get object {}: {}", url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Self::not_found(bucket, key));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Get object failed ({}): {}", status, body).into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read object body: {}", e))?;

        Ok(bytes.to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let url = self.object_url(bucket, key);
        let response = self
            .authorize(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to put object {}: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Put object failed ({}): {}", status, body).into());
        }

        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        let url = self.object_url(bucket, key);
        let response = self
            .authorize(self.client.head(&url))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to head object {}: {}", url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Self::not_found(bucket, key));
        }
        if !status.is_success() {
            return Err(anyhow::anyhow!("Head object failed ({})", status).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_joins_path_style() {
        let store = HttpObjectStore::new("http://storage.internal:9000/", None);
        assert_eq!(
            store.object_url("media", "video/m1/p1.mp4"),
            "http://storage.internal:9000/media/video/m1/p1.mp4"
        );
    }
}
