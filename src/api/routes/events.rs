//! Event intake endpoints.
//!
//! The media service (or an operator replaying an event) posts pipeline
//! lifecycle events here. Deletion events become pipeline runs; every
//! other event type is acknowledged and dropped.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::pipeline::{PipelineEvent, PipelineEventDetail, RunHandle, RunRegistry};

/// Commands routed from the API to the service loop.
#[derive(Clone)]
pub enum ApiCommand {
    /// Drive the pipeline for one deletion event.
    ProcessEvent {
        detail: PipelineEventDetail,
        handle: RunHandle,
    },
}

#[derive(Clone)]
pub struct EventsState {
    pub tx: mpsc::Sender<ApiCommand>,
    pub runs: RunRegistry,
}

pub fn router(state: EventsState) -> Router {
    Router::new()
        .route("/events/media-pipeline", post(ingest_event))
        .with_state(state)
}

/// POST /events/media-pipeline - Accept a pipeline lifecycle event.
///
/// Responds as soon as the run is queued; progress is visible under
/// `/runs/:id`.
async fn ingest_event(
    State(state): State<EventsState>,
    Json(event): Json<PipelineEvent>,
) -> Result<Json<Value>, StatusCode> {
    if !event.is_pipeline_deletion() {
        info!(
            event_type = %event.detail.event_type,
            "Ignoring non-deletion pipeline event"
        );
        return Ok(Json(json!({
            "accepted": false,
            "message": "Only media pipeline deletion events start a run",
        })));
    }

    let detail = event.detail;
    let handle = state
        .runs
        .register(&detail.meeting_id, &detail.media_pipeline_id)
        .await;
    let run_id = handle.id().to_string();

    info!(
        meeting_id = %detail.meeting_id,
        run_id = %run_id,
        "Pipeline deletion event received via API"
    );

    match state.tx.send(ApiCommand::ProcessEvent { detail, handle }).await {
        Ok(_) => Ok(Json(json!({
            "accepted": true,
            "run_id": run_id,
        }))),
        Err(e) => {
            error!("Failed to queue pipeline event: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
