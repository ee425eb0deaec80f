//! Run state machine.
//!
//! A run is a sequence of states, each mapped to one step call; the
//! driver loop applies transitions until a terminal outcome falls out.
//! Polling is expressed as a state transitioning back to itself behind
//! a delay, so the step function stays free of sleeps and every
//! transition can be asserted on directly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::knowledge::IngestionJobStatus;
use crate::transcription::{
    JobTag, TranscriptionJob, TranscriptionJobRequest, TranscriptionJobStatus,
};

use super::event::PipelineEventDetail;
use super::format::FormatResult;
use super::prepare::JobDescriptor;
use super::runs::{RunHandle, RunPhase};
use super::summarize::SummarizeStatus;
use super::SummaryPipeline;

/// Where a run currently stands. States carry everything the next step
/// needs, so a step never re-derives earlier results.
#[derive(Debug, Clone)]
pub enum RunState {
    Prepare,
    StartTranscription {
        descriptor: JobDescriptor,
    },
    PollTranscription {
        descriptor: JobDescriptor,
        job_name: String,
    },
    Format {
        descriptor: JobDescriptor,
        job: TranscriptionJob,
    },
    Summarize {
        descriptor: JobDescriptor,
        transcript: FormatResult,
    },
    StartIngestion,
    PollIngestion {
        job_id: String,
    },
}

impl RunState {
    pub fn phase(&self) -> RunPhase {
        match self {
            Self::Prepare => RunPhase::Preparing,
            Self::StartTranscription { .. } | Self::PollTranscription { .. } => {
                RunPhase::Transcribing
            }
            Self::Format { .. } => RunPhase::Formatting,
            Self::Summarize { .. } => RunPhase::Summarizing,
            Self::StartIngestion | Self::PollIngestion { .. } => RunPhase::Ingesting,
        }
    }
}

/// What the driver does after a step.
#[derive(Debug)]
pub enum Transition {
    Next(RunState),
    Wait { delay: Duration, next: RunState },
    Done(RunOutcome),
}

/// Terminal result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Summary stored and knowledge index refreshed.
    Completed,
    /// The event came from the capture pipeline; nothing to do.
    Skipped,
    Failed { reason: String },
}

impl SummaryPipeline {
    /// Drive one event to its terminal outcome, updating the run
    /// handle's phase along the way. Errors out of individual steps
    /// surface as `Err`; the caller decides how to record them.
    pub async fn run(
        &self,
        event: &PipelineEventDetail,
        handle: &RunHandle,
    ) -> Result<RunOutcome> {
        info!(
            meeting_id = %event.meeting_id,
            media_pipeline_id = %event.media_pipeline_id,
            "Processing media pipeline deletion"
        );

        let mut state = RunState::Prepare;
        loop {
            handle.set_phase(state.phase()).await;
            match self.step(state, event).await? {
                Transition::Next(next) => state = next,
                Transition::Wait { delay, next } => {
                    debug!(delay_ms = delay.as_millis() as u64, "Job still running");
                    tokio::time::sleep(delay).await;
                    state = next;
                }
                Transition::Done(outcome) => return Ok(outcome),
            }
        }
    }

    async fn step(&self, state: RunState, event: &PipelineEventDetail) -> Result<Transition> {
        match state {
            RunState::Prepare => {
                let descriptor = self.prepare_input(event).await?;
                if !descriptor.is_event_concatenated_media_pipeline {
                    return Ok(Transition::Done(RunOutcome::Skipped));
                }
                Ok(Transition::Next(RunState::StartTranscription { descriptor }))
            }

            RunState::StartTranscription { descriptor } => {
                let job = self.start_transcription(&descriptor).await?;
                Ok(Transition::Next(RunState::PollTranscription {
                    descriptor,
                    job_name: job.job_name,
                }))
            }

            RunState::PollTranscription {
                descriptor,
                job_name,
            } => {
                let job = self
                    .transcription
                    .get_job(&job_name)
                    .await
                    .with_context(|| format!("Failed to poll transcription job {job_name}"))?;

                match job.status {
                    TranscriptionJobStatus::Completed => {
                        Ok(Transition::Next(RunState::Format { descriptor, job }))
                    }
                    TranscriptionJobStatus::Failed => {
                        let reason = job
                            .failure_reason
                            .unwrap_or_else(|| "no reason reported".to_string());
                        Ok(Transition::Done(RunOutcome::Failed {
                            reason: format!("Transcription job {job_name} failed: {reason}"),
                        }))
                    }
                    _ => Ok(Transition::Wait {
                        delay: self.settings.transcription_poll_interval,
                        next: RunState::PollTranscription {
                            descriptor,
                            job_name,
                        },
                    }),
                }
            }

            RunState::Format { descriptor, job } => {
                let transcript = self.format_transcription(&job, &descriptor).await?;
                Ok(Transition::Next(RunState::Summarize {
                    descriptor,
                    transcript,
                }))
            }

            RunState::Summarize {
                descriptor,
                transcript,
            } => {
                let result = self.summarize(&descriptor, &transcript).await;
                match result.status {
                    SummarizeStatus::Succeeded => Ok(Transition::Next(RunState::StartIngestion)),
                    SummarizeStatus::Failed => Ok(Transition::Done(RunOutcome::Failed {
                        reason: format!(
                            "Summary generation failed for meeting {}",
                            descriptor.meeting_id
                        ),
                    })),
                }
            }

            RunState::StartIngestion => {
                let job = self
                    .knowledge
                    .start_ingestion_job()
                    .await
                    .context("Failed to start knowledge ingestion job")?;
                info!(job_id = %job.job_id, "Knowledge ingestion started");
                Ok(Transition::Next(RunState::PollIngestion {
                    job_id: job.job_id,
                }))
            }

            RunState::PollIngestion { job_id } => {
                let job = self
                    .knowledge
                    .get_ingestion_job(&job_id)
                    .await
                    .with_context(|| format!("Failed to poll ingestion job {job_id}"))?;

                match job.status {
                    IngestionJobStatus::Complete => Ok(Transition::Done(RunOutcome::Completed)),
                    IngestionJobStatus::Failed => Ok(Transition::Done(RunOutcome::Failed {
                        reason: format!("Knowledge ingestion job {job_id} failed"),
                    })),
                    _ => Ok(Transition::Wait {
                        delay: self.settings.ingestion_poll_interval,
                        next: RunState::PollIngestion { job_id },
                    }),
                }
            }
        }
    }

    async fn start_transcription(&self, descriptor: &JobDescriptor) -> Result<TranscriptionJob> {
        let request = TranscriptionJobRequest {
            job_name: format!(
                "{}-{}",
                self.settings.job_name_prefix, descriptor.source_file_name_with_date
            ),
            media_uri: descriptor.s3_uri.clone(),
            language_code: self.settings.language_code.clone(),
            output_bucket: self.settings.transcription_bucket.clone(),
            output_key: format!(
                "{}/{}.json",
                descriptor.meeting_id, descriptor.source_file_name
            ),
            max_speaker_labels: self.settings.max_speaker_labels,
            tags: vec![
                JobTag::new("SourceBucketName", descriptor.source_bucket_name.clone()),
                JobTag::new("SourceKeyName", descriptor.source_key_name.clone()),
                JobTag::new("SourceFileName", descriptor.source_file_name.clone()),
            ],
        };

        info!(job_name = %request.job_name, media = %request.media_uri, "Starting transcription job");

        self.transcription
            .start_job(request)
            .await
            .context("Failed to start transcription job")
    }
}
