use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub transcription: TranscriptionConfig,
    pub summarizer: SummarizerConfig,
    pub knowledge: KnowledgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { port: 8737 }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Override for the SQLite file path. Defaults to the data directory.
    pub path: Option<PathBuf>,
}

/// Object storage backend selection plus the three well-known buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// "fs" (directory-backed, default) or "http" (S3-compatible gateway).
    pub backend: String,
    /// Root directory for the fs backend. Defaults to the data directory.
    pub root: Option<PathBuf>,
    /// Base URL for the http backend, e.g. "http://minio.internal:9000".
    pub endpoint: Option<String>,
    /// Bearer token for the http backend.
    pub token: Option<String>,
    /// Bucket holding composited recordings (under the `video/` prefix).
    pub concatenated_bucket: String,
    /// Bucket the transcription service writes raw results into.
    pub transcription_bucket: String,
    /// Bucket the knowledge base indexes; summaries land here.
    pub knowledge_bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "fs".to_string(),
            root: None,
            endpoint: None,
            token: None,
            concatenated_bucket: "concatenated-media".to_string(),
            transcription_bucket: "transcriptions".to_string(),
            knowledge_bucket: "knowledge".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub language_code: String,
    pub max_speaker_labels: u32,
    /// Seconds between status polls while a job is running.
    pub poll_interval_seconds: u64,
    pub job_name_prefix: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9200".to_string(),
            token: None,
            language_code: "en-US".to_string(),
            max_speaker_labels: 10,
            poll_interval_seconds: 20,
            job_name_prefix: "summary-generator".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9300".to_string(),
            token: None,
            model_id: "claude-3-opus".to_string(),
            max_tokens: 4096,
            // Zero temperature keeps summaries reproducible across reruns.
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub knowledge_base_id: String,
    pub data_source_id: String,
    /// Seconds between status polls while an ingestion job is running.
    pub poll_interval_seconds: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9400".to_string(),
            token: None,
            knowledge_base_id: String::new(),
            data_source_id: String::new(),
            poll_interval_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => global::db_file(),
        }
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
