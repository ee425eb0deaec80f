//! The recorded-call summary pipeline.
//!
//! One run per media-pipeline deletion event: prepare (disambiguate
//! capture vs concatenation), transcribe with polling, re-segment the
//! transcript by speaker, summarize with the model, then re-index the
//! knowledge bucket. All durable state lives in the meeting store and
//! object storage; a run itself is ephemeral and tracked only in the
//! in-memory registry.

pub mod event;
pub mod format;
pub mod machine;
pub mod prepare;
pub mod runs;
pub mod summarize;

pub use event::{PipelineEvent, PipelineEventDetail, MEDIA_PIPELINE_DELETED};
pub use format::FormatResult;
pub use machine::{RunOutcome, RunState, Transition};
pub use prepare::JobDescriptor;
pub use runs::{RunHandle, RunPhase, RunRegistry, RunSnapshot};
pub use summarize::{SummarizeResult, SummarizeStatus};

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::knowledge::KnowledgeIndex;
use crate::meeting::MeetingStore;
use crate::object_store::ObjectStore;
use crate::summarizer::LanguageModel;
use crate::transcription::TranscriptionService;

/// Everything a run needs beyond its triggering event, resolved from
/// config at startup so no step reads ambient state.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Bucket holding composited recordings under the `video/` prefix.
    pub concatenated_bucket: String,
    /// Bucket the transcription service writes results into; formatted
    /// transcripts land next to them.
    pub transcription_bucket: String,
    /// Bucket the retrieval index watches; summaries land here.
    pub knowledge_bucket: String,
    pub language_code: String,
    pub max_speaker_labels: u32,
    pub job_name_prefix: String,
    pub transcription_poll_interval: Duration,
    pub ingestion_poll_interval: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            concatenated_bucket: "concatenated-media".to_string(),
            transcription_bucket: "transcriptions".to_string(),
            knowledge_bucket: "knowledge".to_string(),
            language_code: "en-US".to_string(),
            max_speaker_labels: 10,
            job_name_prefix: "summary-generator".to_string(),
            transcription_poll_interval: Duration::from_secs(20),
            ingestion_poll_interval: Duration::from_secs(30),
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concatenated_bucket: config.storage.concatenated_bucket.clone(),
            transcription_bucket: config.storage.transcription_bucket.clone(),
            knowledge_bucket: config.storage.knowledge_bucket.clone(),
            language_code: config.transcription.language_code.clone(),
            max_speaker_labels: config.transcription.max_speaker_labels,
            job_name_prefix: config.transcription.job_name_prefix.clone(),
            transcription_poll_interval: Duration::from_secs(
                config.transcription.poll_interval_seconds,
            ),
            ingestion_poll_interval: Duration::from_secs(config.knowledge.poll_interval_seconds),
        }
    }
}

/// The pipeline itself: service handles plus settings. Cheap to clone;
/// one instance is shared by every concurrent run.
#[derive(Clone)]
pub struct SummaryPipeline {
    meetings: Arc<dyn MeetingStore>,
    objects: Arc<dyn ObjectStore>,
    transcription: Arc<dyn TranscriptionService>,
    model: Arc<dyn LanguageModel>,
    knowledge: Arc<dyn KnowledgeIndex>,
    settings: PipelineSettings,
}

impl SummaryPipeline {
    pub fn new(
        meetings: Arc<dyn MeetingStore>,
        objects: Arc<dyn ObjectStore>,
        transcription: Arc<dyn TranscriptionService>,
        model: Arc<dyn LanguageModel>,
        knowledge: Arc<dyn KnowledgeIndex>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            meetings,
            objects,
            transcription,
            model,
            knowledge,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Handle to the meeting store for read-side callers.
    pub fn meetings(&self) -> Arc<dyn MeetingStore> {
        self.meetings.clone()
    }
}
