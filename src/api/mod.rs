//! REST API server.
//!
//! Provides HTTP endpoints for:
//! - Event intake (POST /events/media-pipeline)
//! - Meeting records with derived pipeline status (GET /meetings)
//! - Run inspection (GET /runs)

pub mod error;
pub mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

use crate::config::Config;
use crate::meeting::MeetingStore;
use crate::pipeline::RunRegistry;

pub use routes::events::{ApiCommand, EventsState};
use routes::meetings::MeetingsState;
use routes::runs::RunsState;

pub struct ApiServer {
    port: u16,
    events: EventsState,
    meetings: MeetingsState,
    runs: RunsState,
}

impl ApiServer {
    pub fn new(
        tx: tokio::sync::mpsc::Sender<ApiCommand>,
        meetings: Arc<dyn MeetingStore>,
        runs: RunRegistry,
        config: &Config,
    ) -> Self {
        Self {
            port: config.service.port,
            events: EventsState {
                tx,
                runs: runs.clone(),
            },
            meetings: MeetingsState { meetings },
            runs: RunsState { runs },
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            // Root and version endpoints
            .route("/", get(status))
            .route("/version", get(version))
            // Domain routes
            .merge(routes::events::router(self.events))
            .merge(routes::meetings::router(self.meetings))
            .merge(routes::runs::router(self.runs))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /                      - Service info");
        info!("  GET  /version               - Version info");
        info!("  POST /events/media-pipeline - Submit a pipeline lifecycle event");
        info!("  GET  /meetings              - List meetings");
        info!("  GET  /meetings/:id          - Get meeting with pipeline status");
        info!("  GET  /runs                  - List pipeline runs");
        info!("  GET  /runs/:id              - Get a single run");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "handover",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "handover"
    }))
}
