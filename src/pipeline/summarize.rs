//! Summary generation.
//!
//! Feeds the formatted speaker transcript to the language model and
//! stores the returned summary in the knowledge bucket. This step never
//! fails the run: model and storage errors collapse into a FAILED
//! result so the pipeline can finish deterministically and report what
//! happened.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::meeting::MeetingPatch;
use crate::summarizer::build_summary_prompt;

use super::format::FormatResult;
use super::prepare::JobDescriptor;
use super::SummaryPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SummarizeStatus {
    Succeeded,
    Failed,
}

/// Outcome of the summarize step. On failure the location fields are
/// absent and `status` alone tells the story.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_key_name: Option<String>,
    pub status: SummarizeStatus,
}

impl SummarizeResult {
    fn succeeded(bucket_name: String, summary_key_name: String) -> Self {
        Self {
            bucket_name: Some(bucket_name),
            summary_key_name: Some(summary_key_name),
            status: SummarizeStatus::Succeeded,
        }
    }

    fn failed() -> Self {
        Self {
            bucket_name: None,
            summary_key_name: None,
            status: SummarizeStatus::Failed,
        }
    }
}

impl SummaryPipeline {
    /// Summarize the formatted transcript. Errors are logged and
    /// reported as a FAILED result rather than propagated.
    pub async fn summarize(
        &self,
        descriptor: &JobDescriptor,
        transcript: &FormatResult,
    ) -> SummarizeResult {
        match self.try_summarize(descriptor, transcript).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    meeting_id = %descriptor.meeting_id,
                    error = %format!("{e:#}"),
                    "Summary generation failed"
                );
                SummarizeResult::failed()
            }
        }
    }

    async fn try_summarize(
        &self,
        descriptor: &JobDescriptor,
        transcript: &FormatResult,
    ) -> Result<SummarizeResult> {
        let raw = self
            .objects
            .get_object(
                &transcript.bucket_name,
                &transcript.speaker_transcription_key_name,
            )
            .await
            .with_context(|| {
                format!(
                    "Failed to download speaker transcript {}/{}",
                    transcript.bucket_name, transcript.speaker_transcription_key_name
                )
            })?;
        let text = String::from_utf8(raw).context("Speaker transcript is not valid UTF-8")?;

        let summary = self
            .model
            .invoke(&build_summary_prompt(&text))
            .await
            .context("Language model invocation failed")?;

        let bucket = self.settings.knowledge_bucket.clone();
        let key = format!(
            "{}/{}-summary.txt",
            descriptor.meeting_id, descriptor.source_file_name
        );
        self.objects
            .put_object(&bucket, &key, summary.into_bytes(), "text/plain")
            .await
            .with_context(|| format!("Failed to upload summary {bucket}/{key}"))?;

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.meetings
            .update(&descriptor.meeting_id, MeetingPatch::summarized_at(now))
            .await
            .context("Failed to stamp summarizedAt on meeting")?;

        info!(
            meeting_id = %descriptor.meeting_id,
            key = %key,
            "Summary written and meeting marked as summarized"
        );

        Ok(SummarizeResult::succeeded(bucket, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(SummarizeStatus::Succeeded).unwrap(),
            "SUCCEEDED"
        );
        assert_eq!(
            serde_json::to_value(SummarizeStatus::Failed).unwrap(),
            "FAILED"
        );
    }

    #[test]
    fn test_failed_result_omits_location() {
        let value = serde_json::to_value(SummarizeResult::failed()).unwrap();
        assert_eq!(value["status"], "FAILED");
        assert!(value.get("bucketName").is_none());
        assert!(value.get("summaryKeyName").is_none());
    }

    #[test]
    fn test_succeeded_result_carries_location() {
        let result = SummarizeResult::succeeded(
            "knowledge".to_string(),
            "m-1/p-1.mp4-summary.txt".to_string(),
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "SUCCEEDED");
        assert_eq!(value["bucketName"], "knowledge");
        assert_eq!(value["summaryKeyName"], "m-1/p-1.mp4-summary.txt");
    }
}
