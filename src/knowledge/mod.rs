//! Retrieval index contract.
//!
//! Re-indexing the knowledge bucket is an asynchronous job owned by
//! the index service; the pipeline starts one and polls it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http_api;

pub use http_api::KnowledgeApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestionJobStatus {
    Starting,
    InProgress,
    Complete,
    Failed,
    #[serde(other)]
    Unknown,
}

impl IngestionJobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "STARTING",
            Self::InProgress => "IN_PROGRESS",
            Self::Complete => "COMPLETE",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionJob {
    pub job_id: String,
    pub status: IngestionJobStatus,
}

#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    /// Start a re-indexing job against the configured index and data
    /// source.
    async fn start_ingestion_job(&self) -> anyhow::Result<IngestionJob>;

    async fn get_ingestion_job(&self, job_id: &str) -> anyhow::Result<IngestionJob>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let status: IngestionJobStatus = serde_json::from_str("\"COMPLETE\"").unwrap();
        assert_eq!(status, IngestionJobStatus::Complete);
        assert_eq!(
            serde_json::to_string(&IngestionJobStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
    }

    #[test]
    fn test_unknown_status_keeps_polling() {
        let status: IngestionJobStatus = serde_json::from_str("\"INDEXING\"").unwrap();
        assert_eq!(status, IngestionJobStatus::Unknown);
        assert!(!status.is_terminal());
    }
}
