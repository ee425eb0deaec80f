//! Media preparation.
//!
//! A pipeline deletion event fires for both the capture pipeline and the
//! concatenation pipeline of the same meeting. Only the concatenation
//! pipeline leaves a composited video behind, so probing for that object
//! tells the two apart.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::meeting::MeetingPatch;
use crate::object_store::object_uri;

use super::event::PipelineEventDetail;
use super::SummaryPipeline;

/// Everything the downstream steps need to know about the source media.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobDescriptor {
    pub meeting_id: String,
    pub is_event_concatenated_media_pipeline: bool,
    pub source_bucket_name: String,
    #[serde(rename = "S3Uri")]
    pub s3_uri: String,
    pub source_key_name: String,
    pub source_file_name: String,
    pub source_file_name_with_date: String,
}

/// Timestamps double as file and job name parts, where `:` and `.`
/// are not accepted.
fn sanitize_timestamp(iso: &str) -> String {
    iso.replace([':', '.'], "-")
}

impl SummaryPipeline {
    /// Classify a pipeline deletion event and describe its media.
    ///
    /// When the composited video exists the meeting's `concatenatedAt`
    /// stamp is written before returning, so the meeting reads as
    /// Summarizing even if a later step dies.
    pub async fn prepare_input(&self, event: &PipelineEventDetail) -> Result<JobDescriptor> {
        let bucket = self.settings.concatenated_bucket.clone();
        let key = format!(
            "video/{}/composited-video/{}.mp4",
            event.meeting_id, event.media_pipeline_id
        );

        let exists = match self.objects.head_object(&bucket, &key).await {
            Ok(()) => true,
            Err(e) if e.is_not_found() => false,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to probe for composited video at {bucket}/{key}")
                })
            }
        };

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let file_name = format!("{}.mp4", event.media_pipeline_id);
        let descriptor = JobDescriptor {
            meeting_id: event.meeting_id.clone(),
            is_event_concatenated_media_pipeline: exists,
            source_bucket_name: bucket.clone(),
            s3_uri: object_uri(&bucket, &key),
            source_key_name: format!(
                "{}/composited-video/{}",
                event.meeting_id, file_name
            ),
            source_file_name: file_name.clone(),
            source_file_name_with_date: format!(
                "{}-{}.mp4",
                event.media_pipeline_id,
                sanitize_timestamp(&now)
            ),
        };

        if !exists {
            info!(
                meeting_id = %event.meeting_id,
                media_pipeline_id = %event.media_pipeline_id,
                "No composited video found, treating event as capture pipeline deletion"
            );
            return Ok(descriptor);
        }

        self.meetings
            .update(&event.meeting_id, MeetingPatch::concatenated_at(now))
            .await
            .context("Failed to stamp concatenatedAt on meeting")?;

        info!(
            meeting_id = %event.meeting_id,
            source = %descriptor.s3_uri,
            "Composited video located, meeting marked as concatenated"
        );

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_timestamp() {
        assert_eq!(
            sanitize_timestamp("2024-05-01T09:30:15.250Z"),
            "2024-05-01T09-30-15-250Z"
        );
    }

    #[test]
    fn test_descriptor_wire_names() {
        let descriptor = JobDescriptor {
            meeting_id: "m-1".to_string(),
            is_event_concatenated_media_pipeline: true,
            source_bucket_name: "concatenated-media".to_string(),
            s3_uri: "s3://concatenated-media/video/m-1/composited-video/p-1.mp4".to_string(),
            source_key_name: "m-1/composited-video/p-1.mp4".to_string(),
            source_file_name: "p-1.mp4".to_string(),
            source_file_name_with_date: "p-1-2024-05-01T09-30-15-250Z.mp4".to_string(),
        };

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["MeetingId"], "m-1");
        assert_eq!(value["IsEventConcatenatedMediaPipeline"], true);
        assert_eq!(value["SourceBucketName"], "concatenated-media");
        assert_eq!(
            value["S3Uri"],
            "s3://concatenated-media/video/m-1/composited-video/p-1.mp4"
        );
        assert_eq!(value["SourceKeyName"], "m-1/composited-video/p-1.mp4");
        assert_eq!(value["SourceFileName"], "p-1.mp4");
        assert_eq!(
            value["SourceFileNameWithDate"],
            "p-1-2024-05-01T09-30-15-250Z.mp4"
        );
    }

    #[test]
    fn test_descriptor_round_trip() {
        let json = serde_json::json!({
            "MeetingId": "m-2",
            "IsEventConcatenatedMediaPipeline": false,
            "SourceBucketName": "concatenated-media",
            "S3Uri": "s3://concatenated-media/video/m-2/composited-video/p-9.mp4",
            "SourceKeyName": "m-2/composited-video/p-9.mp4",
            "SourceFileName": "p-9.mp4",
            "SourceFileNameWithDate": "p-9-2024-05-01T09-30-15-250Z.mp4",
        });

        let descriptor: JobDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(descriptor.meeting_id, "m-2");
        assert!(!descriptor.is_event_concatenated_media_pipeline);
        assert_eq!(descriptor.source_file_name, "p-9.mp4");
    }
}
