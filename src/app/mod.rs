use crate::api::{ApiCommand, ApiServer};
use crate::config::Config;
use crate::global;
use crate::knowledge::KnowledgeApi;
use crate::meeting::SqliteMeetingStore;
use crate::object_store::{FsObjectStore, HttpObjectStore, ObjectStore};
use crate::pipeline::{PipelineSettings, RunOutcome, RunRegistry, SummaryPipeline};
use crate::summarizer::{ModelApi, ModelParams};
use crate::transcription::TranscriptionApi;
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

pub async fn run_service() -> Result<()> {
    info!("Starting handover service");

    let config = Config::load()?;
    let pipeline = build_pipeline(&config)?;
    let registry = RunRegistry::default();

    let (tx, mut rx) = mpsc::channel::<ApiCommand>(10);

    let api_server = ApiServer::new(tx, pipeline.meetings(), registry.clone(), &config);
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("Handover is ready!");
    info!(
        "Submit an event: curl -X POST http://127.0.0.1:{}/events/media-pipeline -H 'Content-Type: application/json' -d @event.json",
        config.service.port
    );

    while let Some(command) = rx.recv().await {
        match command {
            ApiCommand::ProcessEvent { detail, handle } => {
                let pipeline = pipeline.clone();
                tokio::spawn(async move {
                    let outcome = match pipeline.run(&detail, &handle).await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            error!("Pipeline run failed: {:#}", e);
                            RunOutcome::Failed {
                                reason: format!("{e:#}"),
                            }
                        }
                    };

                    match &outcome {
                        RunOutcome::Completed => {
                            info!(meeting_id = %detail.meeting_id, "Run completed")
                        }
                        RunOutcome::Skipped => {
                            info!(meeting_id = %detail.meeting_id, "Run skipped")
                        }
                        RunOutcome::Failed { reason } => {
                            error!(meeting_id = %detail.meeting_id, reason = %reason, "Run failed")
                        }
                    }

                    handle.finish(outcome).await;
                });
            }
        }
    }

    Ok(())
}

/// Wire every remote client and the store from config. Shared by the
/// service and the CLI `process` command.
pub fn build_pipeline(config: &Config) -> Result<SummaryPipeline> {
    let meetings = Arc::new(SqliteMeetingStore::new(config.db_path()?)?);
    let objects = build_object_store(config)?;

    let transcription = Arc::new(TranscriptionApi::new(
        &config.transcription.endpoint,
        config.transcription.token.clone(),
    ));
    let model = Arc::new(ModelApi::new(
        &config.summarizer.endpoint,
        config.summarizer.token.clone(),
        ModelParams {
            model_id: config.summarizer.model_id.clone(),
            max_tokens: config.summarizer.max_tokens,
            temperature: config.summarizer.temperature,
        },
    ));
    let knowledge = Arc::new(KnowledgeApi::new(
        &config.knowledge.endpoint,
        config.knowledge.token.clone(),
        &config.knowledge.knowledge_base_id,
        &config.knowledge.data_source_id,
    ));

    Ok(SummaryPipeline::new(
        meetings,
        objects,
        transcription,
        model,
        knowledge,
        PipelineSettings::from_config(config),
    ))
}

fn build_object_store(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    match config.storage.backend.as_str() {
        "fs" => {
            let root = match &config.storage.root {
                Some(root) => root.clone(),
                None => global::storage_dir()?,
            };
            Ok(Arc::new(FsObjectStore::new(root)?))
        }
        "http" => {
            let endpoint = config
                .storage
                .endpoint
                .as_deref()
                .context("storage.endpoint is required for the http backend")?;
            Ok(Arc::new(HttpObjectStore::new(
                endpoint,
                config.storage.token.clone(),
            )))
        }
        other => bail!("Unknown storage backend {other:?} (expected \"fs\" or \"http\")"),
    }
}
