//! In-memory run registry.
//!
//! Operator-visible history of pipeline runs. Nothing here is durable;
//! a restart forgets past runs while the meeting stamps and stored
//! artifacts keep the authoritative record.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::machine::RunOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Pending,
    Preparing,
    Transcribing,
    Formatting,
    Summarizing,
    Ingesting,
    Finished,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Transcribing => "transcribing",
            Self::Formatting => "formatting",
            Self::Summarizing => "summarizing",
            Self::Ingesting => "ingesting",
            Self::Finished => "finished",
        }
    }
}

/// Point-in-time view of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub id: String,
    pub meeting_id: String,
    pub media_pipeline_id: String,
    pub phase: RunPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RunOutcome>,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

/// Shared registry of runs; clones see the same state.
#[derive(Clone, Default)]
pub struct RunRegistry {
    inner: Arc<Mutex<Vec<RunSnapshot>>>,
}

impl RunRegistry {
    /// Record a new run and return the handle its driver updates.
    pub async fn register(&self, meeting_id: &str, media_pipeline_id: &str) -> RunHandle {
        let id = Uuid::new_v4().to_string();
        let snapshot = RunSnapshot {
            id: id.clone(),
            meeting_id: meeting_id.to_string(),
            media_pipeline_id: media_pipeline_id.to_string(),
            phase: RunPhase::Pending,
            outcome: None,
            started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            finished_at: None,
        };

        self.inner.lock().await.push(snapshot);

        RunHandle {
            registry: self.clone(),
            id,
        }
    }

    pub async fn get(&self, id: &str) -> Option<RunSnapshot> {
        self.inner.lock().await.iter().find(|r| r.id == id).cloned()
    }

    /// All runs, newest first.
    pub async fn list(&self) -> Vec<RunSnapshot> {
        self.inner.lock().await.iter().rev().cloned().collect()
    }
}

/// Updates one run's registry entry as its driver advances.
#[derive(Clone)]
pub struct RunHandle {
    registry: RunRegistry,
    id: String,
}

impl RunHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn set_phase(&self, phase: RunPhase) {
        self.update(|run| run.phase = phase).await;
    }

    pub async fn finish(&self, outcome: RunOutcome) {
        self.update(|run| {
            run.phase = RunPhase::Finished;
            run.outcome = Some(outcome);
            run.finished_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        })
        .await;
    }

    async fn update(&self, f: impl FnOnce(&mut RunSnapshot)) {
        let mut runs = self.registry.inner.lock().await;
        if let Some(run) = runs.iter_mut().find(|r| r.id == self.id) {
            f(run);
        }
    }
}
