//! Shared fakes and fixtures for the pipeline flow tests.
//!
//! Remote services are scripted fakes; the meeting store and object
//! store are the real implementations over a temp directory.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use handover::knowledge::{IngestionJob, IngestionJobStatus, KnowledgeIndex};
use handover::meeting::{Meeting, SqliteMeetingStore};
use handover::object_store::{FsObjectStore, ObjectStore};
use handover::pipeline::{PipelineSettings, SummaryPipeline};
use handover::summarizer::LanguageModel;
use handover::transcription::{
    TranscriptionJob, TranscriptionJobRequest, TranscriptionJobStatus, TranscriptionService,
};

/// Transcription service fake that answers polls from a scripted status
/// sequence; once the script runs out it reports COMPLETED.
pub struct ScriptedTranscription {
    pub requests: Mutex<Vec<TranscriptionJobRequest>>,
    statuses: Mutex<VecDeque<TranscriptionJobStatus>>,
    polls: AtomicUsize,
}

impl ScriptedTranscription {
    pub fn with_statuses(statuses: &[TranscriptionJobStatus]) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            statuses: Mutex::new(statuses.iter().copied().collect()),
            polls: AtomicUsize::new(0),
        })
    }

    pub fn started(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn polled(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionService for ScriptedTranscription {
    async fn start_job(&self, request: TranscriptionJobRequest) -> Result<TranscriptionJob> {
        let job_name = request.job_name.clone();
        self.requests.lock().unwrap().push(request);
        Ok(TranscriptionJob {
            job_name,
            status: TranscriptionJobStatus::Queued,
            transcript_file_uri: None,
            failure_reason: None,
        })
    }

    async fn get_job(&self, job_name: &str) -> Result<TranscriptionJob> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(TranscriptionJobStatus::Completed);

        // The real service writes its result where the request asked.
        let transcript_file_uri = (status == TranscriptionJobStatus::Completed).then(|| {
            let requests = self.requests.lock().unwrap();
            let request = requests.last().expect("get_job called before start_job");
            format!("s3://{}/{}", request.output_bucket, request.output_key)
        });

        Ok(TranscriptionJob {
            job_name: job_name.to_string(),
            status,
            transcript_file_uri,
            failure_reason: (status == TranscriptionJobStatus::Failed)
                .then(|| "media could not be decoded".to_string()),
        })
    }
}

/// Language model fake that records prompts and replies with a fixed
/// summary.
pub struct StaticModel {
    pub prompts: Mutex<Vec<String>>,
    reply: &'static str,
}

impl StaticModel {
    pub fn replying(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply,
        })
    }
}

#[async_trait]
impl LanguageModel for StaticModel {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.to_string())
    }
}

pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn invoke(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("model endpoint offline")
    }
}

/// Knowledge index fake with a scripted ingestion status sequence.
pub struct ScriptedKnowledge {
    statuses: Mutex<VecDeque<IngestionJobStatus>>,
    started: AtomicUsize,
}

impl ScriptedKnowledge {
    pub fn with_statuses(statuses: &[IngestionJobStatus]) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            started: AtomicUsize::new(0),
        })
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeIndex for ScriptedKnowledge {
    async fn start_ingestion_job(&self) -> Result<IngestionJob> {
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(IngestionJob {
            job_id: "ing-1".to_string(),
            status: IngestionJobStatus::Starting,
        })
    }

    async fn get_ingestion_job(&self, job_id: &str) -> Result<IngestionJob> {
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(IngestionJobStatus::Complete);
        Ok(IngestionJob {
            job_id: job_id.to_string(),
            status,
        })
    }
}

pub struct TestHarness {
    pub pipeline: SummaryPipeline,
    pub meetings: Arc<SqliteMeetingStore>,
    pub objects: Arc<FsObjectStore>,
    _dir: tempfile::TempDir,
}

/// Pipeline over a temp directory with near-zero poll intervals.
pub fn harness(
    transcription: Arc<ScriptedTranscription>,
    model: Arc<dyn LanguageModel>,
    knowledge: Arc<ScriptedKnowledge>,
) -> TestHarness {
    let dir = tempfile::tempdir().unwrap();
    let meetings = Arc::new(SqliteMeetingStore::new(dir.path().join("meetings.db")).unwrap());
    let objects = Arc::new(FsObjectStore::new(dir.path().join("objects")).unwrap());
    let settings = PipelineSettings {
        transcription_poll_interval: Duration::from_millis(1),
        ingestion_poll_interval: Duration::from_millis(1),
        ..PipelineSettings::default()
    };

    let pipeline = SummaryPipeline::new(
        meetings.clone(),
        objects.clone(),
        transcription,
        model,
        knowledge,
        settings,
    );

    TestHarness {
        pipeline,
        meetings,
        objects,
        _dir: dir,
    }
}

pub fn meeting(id: &str) -> Meeting {
    Meeting {
        id: id.to_string(),
        alert_id: "alert-7".to_string(),
        capture_pipeline_arn: "pipeline/capture-1".to_string(),
        concat_pipeline_arn: "pipeline/concat-1".to_string(),
        created_at: "2024-05-01T09:00:00.000Z".to_string(),
        concatenated_at: None,
        summarized_at: None,
    }
}

pub async fn seed_composited_video(objects: &FsObjectStore, meeting_id: &str, pipeline_id: &str) {
    objects
        .put_object(
            "concatenated-media",
            &format!("video/{meeting_id}/composited-video/{pipeline_id}.mp4"),
            b"media".to_vec(),
            "video/mp4",
        )
        .await
        .unwrap();
}

/// Raw transcription result with two speakers, as the transcription
/// service would have written it to the output bucket.
pub async fn seed_transcript_document(
    objects: &FsObjectStore,
    meeting_id: &str,
    pipeline_id: &str,
) {
    let document = serde_json::json!({
        "results": {
            "transcripts": [{"transcript": "Hello world. Hi there."}],
            "speaker_labels": {"speakers": 2},
            "items": [
                {
                    "type": "pronunciation",
                    "start_time": "0.0",
                    "end_time": "0.4",
                    "speaker_label": "spk_0",
                    "alternatives": [{"confidence": "0.99", "content": "Hello"}]
                },
                {
                    "type": "pronunciation",
                    "start_time": "0.5",
                    "end_time": "0.9",
                    "speaker_label": "spk_0",
                    "alternatives": [{"confidence": "0.98", "content": "world"}]
                },
                {
                    "type": "punctuation",
                    "alternatives": [{"content": "."}]
                },
                {
                    "type": "pronunciation",
                    "start_time": "1.2",
                    "end_time": "1.4",
                    "speaker_label": "spk_1",
                    "alternatives": [{"confidence": "0.97", "content": "Hi"}]
                },
                {
                    "type": "pronunciation",
                    "start_time": "1.5",
                    "end_time": "1.8",
                    "speaker_label": "spk_1",
                    "alternatives": [{"confidence": "0.99", "content": "there"}]
                },
                {
                    "type": "punctuation",
                    "alternatives": [{"content": "."}]
                }
            ]
        }
    });

    objects
        .put_object(
            "transcriptions",
            &format!("{meeting_id}/{pipeline_id}.mp4.json"),
            serde_json::to_vec(&document).unwrap(),
            "application/json",
        )
        .await
        .unwrap();
}
