//! Transcription service contract.
//!
//! Submitting a job and polling it are the only two operations the
//! pipeline needs; the service owns job state and writes its raw result
//! JSON to the transcription bucket itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod document;
pub mod http_api;

pub use document::TranscriptDocument;
pub use http_api::TranscriptionApi;

/// Request to start a transcription job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionJobRequest {
    pub job_name: String,
    /// `s3://bucket/key` URI of the source media.
    pub media_uri: String,
    pub language_code: String,
    /// Bucket the service writes the raw result JSON into.
    pub output_bucket: String,
    pub output_key: String,
    /// Speaker diarization cap; diarization itself is always on.
    pub max_speaker_labels: u32,
    /// Source provenance carried on the job.
    pub tags: Vec<JobTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTag {
    pub key: String,
    pub value: String,
}

impl JobTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranscriptionJobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    /// Statuses this build does not know; the poll loop keeps waiting.
    #[serde(other)]
    Unknown,
}

impl TranscriptionJobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Snapshot of a transcription job as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionJob {
    pub job_name: String,
    pub status: TranscriptionJobStatus,
    /// Where the raw result JSON landed; present once the job completes.
    pub transcript_file_uri: Option<String>,
    pub failure_reason: Option<String>,
}

#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Submit a job. Submission failure is fatal to the run; there is
    /// no retry below the poll loop.
    async fn start_job(&self, request: TranscriptionJobRequest) -> anyhow::Result<TranscriptionJob>;

    async fn get_job(&self, job_name: &str) -> anyhow::Result<TranscriptionJob>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let status: TranscriptionJobStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, TranscriptionJobStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&TranscriptionJobStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn test_unknown_status_is_caught() {
        let status: TranscriptionJobStatus = serde_json::from_str("\"DRAINING\"").unwrap();
        assert_eq!(status, TranscriptionJobStatus::Unknown);
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TranscriptionJobStatus::Completed.is_terminal());
        assert!(TranscriptionJobStatus::Failed.is_terminal());
        assert!(!TranscriptionJobStatus::Queued.is_terminal());
        assert!(!TranscriptionJobStatus::InProgress.is_terminal());
    }
}
