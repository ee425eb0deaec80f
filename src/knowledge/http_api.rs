//! HTTP client for the retrieval index's ingestion jobs API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{IngestionJob, IngestionJobStatus, KnowledgeIndex};

pub struct KnowledgeApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    knowledge_base_id: String,
    data_source_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestionJobEnvelope {
    ingestion_job: IngestionJobBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestionJobBody {
    ingestion_job_id: String,
    status: IngestionJobStatus,
}

impl From<IngestionJobBody> for IngestionJob {
    fn from(body: IngestionJobBody) -> Self {
        Self {
            job_id: body.ingestion_job_id,
            status: body.status,
        }
    }
}

impl KnowledgeApi {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        knowledge_base_id: &str,
        data_source_id: &str,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            knowledge_base_id: knowledge_base_id.to_string(),
            data_source_id: data_source_id.to_string(),
        }
    }

    fn jobs_url(&self) -> String {
        format!(
            "{}/knowledge-bases/{}/data-sources/{}/ingestion-jobs",
            self.base_url, self.knowledge_base_id, self.data_source_id
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl KnowledgeIndex for KnowledgeApi {
    async fn start_ingestion_job(&self) -> Result<IngestionJob> {
        let response = self
            .authorize(self.client.post(self.jobs_url()))
            .json(&json!({
                "knowledgeBaseId": self.knowledge_base_id,
                "dataSourceId": self.data_source_id,
            }))
            .send()
            .await
            .context("Failed to start ingestion job")?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Ingestion job submission failed ({}): {}",
                status,
                text
            ));
        }

        let envelope: IngestionJobEnvelope =
            serde_json::from_str(&text).context("Failed to parse ingestion job response")?;

        Ok(envelope.ingestion_job.into())
    }

    async fn get_ingestion_job(&self, job_id: &str) -> Result<IngestionJob> {
        let url = format!("{}/{}", self.jobs_url(), job_id);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .context("Failed to get ingestion job")?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Failed to get ingestion job ({}): {}",
                status,
                text
            ));
        }

        let envelope: IngestionJobEnvelope =
            serde_json::from_str(&text).context("Failed to parse ingestion job response")?;

        Ok(envelope.ingestion_job.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses() {
        let json = r#"{"ingestionJob": {"ingestionJobId": "ing-1", "status": "STARTING"}}"#;
        let envelope: IngestionJobEnvelope = serde_json::from_str(json).unwrap();
        let job: IngestionJob = envelope.ingestion_job.into();
        assert_eq!(job.job_id, "ing-1");
        assert_eq!(job.status, IngestionJobStatus::Starting);
    }

    #[test]
    fn test_jobs_url() {
        let api = KnowledgeApi::new("http://index.internal:9400/", None, "kb-1", "ds-1");
        assert_eq!(
            api.jobs_url(),
            "http://index.internal:9400/knowledge-bases/kb-1/data-sources/ds-1/ingestion-jobs"
        );
    }
}
