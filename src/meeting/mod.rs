//! Meeting domain types.
//!
//! A meeting record is created (externally) when an operator starts a
//! recorded call against an alert. The pipeline only ever advances two
//! fields afterwards: the `concatenated_at` and `summarized_at` stamps,
//! which drive the derived status.

pub mod store;

pub use store::{MeetingStore, SqliteMeetingStore, StoreError};

use serde::{Deserialize, Serialize};

/// A meeting record. Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub alert_id: String,
    /// Opaque reference to the capture pipeline resource.
    pub capture_pipeline_arn: String,
    /// Opaque reference to the concatenation pipeline resource.
    pub concat_pipeline_arn: String,
    pub created_at: String,
    /// Set once the composited media exists. Never cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concatenated_at: Option<String>,
    /// Set once summarization succeeds. Never cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarized_at: Option<String>,
}

/// Pipeline progress derived from the two stamps; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingStatus {
    Saving,
    Summarizing,
    Completed,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saving => "Saving",
            Self::Summarizing => "Summarizing",
            Self::Completed => "Completed",
        }
    }
}

impl Meeting {
    pub fn status(&self) -> MeetingStatus {
        match (&self.concatenated_at, &self.summarized_at) {
            (None, _) => MeetingStatus::Saving,
            (Some(_), None) => MeetingStatus::Summarizing,
            (Some(_), Some(_)) => MeetingStatus::Completed,
        }
    }
}

/// Partial update for a meeting record. Only populated fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concatenated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarized_at: Option<String>,
}

impl MeetingPatch {
    pub fn concatenated_at(timestamp: impl Into<String>) -> Self {
        Self {
            concatenated_at: Some(timestamp.into()),
            ..Self::default()
        }
    }

    pub fn summarized_at(timestamp: impl Into<String>) -> Self {
        Self {
            summarized_at: Some(timestamp.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.concatenated_at.is_none() && self.summarized_at.is_none()
    }
}
