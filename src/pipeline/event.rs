//! Media-pipeline lifecycle events.
//!
//! Both the capture pipeline and the concatenation pipeline emit a
//! structurally identical deletion event, so every run starts from the
//! same envelope and the preparation step disambiguates by probing for
//! the composited object.

use serde::{Deserialize, Serialize};

/// Event type signalling that a media pipeline resource was deleted.
pub const MEDIA_PIPELINE_DELETED: &str = "MediaPipelineDeleted";

/// Deletion-event envelope as delivered by the media service. Unknown
/// envelope fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub detail: PipelineEventDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineEventDetail {
    pub meeting_id: String,
    pub media_pipeline_id: String,
    pub event_type: String,
}

impl PipelineEventDetail {
    pub fn deletion(meeting_id: &str, media_pipeline_id: &str) -> Self {
        Self {
            meeting_id: meeting_id.to_string(),
            media_pipeline_id: media_pipeline_id.to_string(),
            event_type: MEDIA_PIPELINE_DELETED.to_string(),
        }
    }
}

impl PipelineEvent {
    /// Only deletion events start a run; everything else is dropped at
    /// intake.
    pub fn is_pipeline_deletion(&self) -> bool {
        self.detail.event_type == MEDIA_PIPELINE_DELETED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_envelope_ignoring_extra_fields() {
        let json = r#"{
            "version": "0",
            "id": "482cc26c-e10f-8471-a03a-417ce1b7cb91",
            "detail": {
                "version": "0",
                "eventType": "MediaPipelineDeleted",
                "timestamp": 1723000036853,
                "meetingId": "m1",
                "mediaPipelineId": "p1",
                "mediaRegion": "eu-west-1"
            }
        }"#;

        let event: PipelineEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.detail.meeting_id, "m1");
        assert_eq!(event.detail.media_pipeline_id, "p1");
        assert!(event.is_pipeline_deletion());
    }

    #[test]
    fn test_other_event_types_are_not_deletions() {
        let event = PipelineEvent {
            detail: PipelineEventDetail {
                meeting_id: "m1".to_string(),
                media_pipeline_id: "p1".to_string(),
                event_type: "MediaPipelineInProgress".to_string(),
            },
        };
        assert!(!event.is_pipeline_deletion());
    }
}
