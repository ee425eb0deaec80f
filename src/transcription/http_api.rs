//! HTTP client for the transcription service's jobs API.
//!
//! The wire format is the service's own PascalCase envelope; this
//! module maps it onto the neutral job types the pipeline uses.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    TranscriptionJob, TranscriptionJobRequest, TranscriptionJobStatus, TranscriptionService,
};

pub struct TranscriptionApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StartJobBody {
    transcription_job_name: String,
    media: MediaBody,
    language_code: String,
    output_bucket_name: String,
    output_key: String,
    settings: SettingsBody,
    tags: Vec<TagBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MediaBody {
    media_file_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SettingsBody {
    show_speaker_labels: bool,
    max_speaker_labels: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TagBody {
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JobEnvelope {
    transcription_job: JobBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JobBody {
    transcription_job_name: String,
    transcription_job_status: TranscriptionJobStatus,
    transcript: Option<TranscriptBody>,
    failure_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TranscriptBody {
    transcript_file_uri: Option<String>,
}

impl From<JobBody> for TranscriptionJob {
    fn from(body: JobBody) -> Self {
        Self {
            job_name: body.transcription_job_name,
            status: body.transcription_job_status,
            transcript_file_uri: body.transcript.and_then(|t| t.transcript_file_uri),
            failure_reason: body.failure_reason,
        }
    }
}

impl TranscriptionApi {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl TranscriptionService for TranscriptionApi {
    async fn start_job(&self, request: TranscriptionJobRequest) -> Result<TranscriptionJob> {
        let url = format!("{}/jobs", self.base_url);
        let body = StartJobBody {
            transcription_job_name: request.job_name,
            media: MediaBody {
                media_file_uri: request.media_uri,
            },
            language_code: request.language_code,
            output_bucket_name: request.output_bucket,
            output_key: request.output_key,
            settings: SettingsBody {
                show_speaker_labels: true,
                max_speaker_labels: request.max_speaker_labels,
            },
            tags: request
                .tags
                .into_iter()
                .map(|t| TagBody {
                    key: t.key,
                    value: t.value,
                })
                .collect(),
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .context("Failed to submit transcription job")?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Transcription job submission failed ({}): {}",
                status,
                text
            ));
        }

        let envelope: JobEnvelope =
            serde_json::from_str(&text).context("Failed to parse transcription job response")?;

        Ok(envelope.transcription_job.into())
    }

    async fn get_job(&self, job_name: &str) -> Result<TranscriptionJob> {
        let url = format!("{}/jobs/{}", self.base_url, job_name);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .context("Failed to get transcription job")?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Failed to get transcription job ({}): {}",
                status,
                text
            ));
        }

        let envelope: JobEnvelope =
            serde_json::from_str(&text).context("Failed to parse transcription job response")?;

        Ok(envelope.transcription_job.into())
    }
}
