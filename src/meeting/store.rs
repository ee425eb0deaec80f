//! Meeting record store.
//!
//! Async trait over the SQLite repository so pipeline steps and API
//! handlers take an injected handle instead of opening connections
//! themselves. Not-found is a distinct variant because the pipeline
//! treats it differently from infrastructure failures.

use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{Meeting, MeetingPatch};
use crate::db::{self, meetings::MeetingRepository};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("meeting {0} not found")]
    MeetingNotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn create(&self, meeting: Meeting) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Meeting, StoreError>;

    async fn find_all_by_alert_id(&self, alert_id: &str) -> Result<Vec<Meeting>, StoreError>;

    /// Most recently created first.
    async fn list(&self, limit: usize) -> Result<Vec<Meeting>, StoreError>;

    /// Partial update; only fields present in the patch are written.
    async fn update(&self, id: &str, patch: MeetingPatch) -> Result<(), StoreError>;

    async fn remove(&self, id: &str) -> Result<(), StoreError>;
}

/// SQLite-backed store. Holds the database path and opens a connection
/// per call inside `spawn_blocking`, so async callers never block on
/// rusqlite.
#[derive(Debug, Clone)]
pub struct SqliteMeetingStore {
    path: PathBuf,
}

impl SqliteMeetingStore {
    /// Open (creating if needed) and migrate the database at `path`.
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = db::open(&path)?;
        db::migrate(&conn)?;
        Ok(Self { path })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db::open(&path)?;
            f(&conn)
        })
        .await
        .context("Meeting store task panicked")?
    }
}

#[async_trait]
impl MeetingStore for SqliteMeetingStore {
    async fn create(&self, meeting: Meeting) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            MeetingRepository::insert(conn, &meeting)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Meeting, StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            MeetingRepository::get(conn, &id)?.ok_or(StoreError::MeetingNotFound(id))
        })
        .await
    }

    async fn find_all_by_alert_id(&self, alert_id: &str) -> Result<Vec<Meeting>, StoreError> {
        let alert_id = alert_id.to_string();
        self.with_conn(move |conn| Ok(MeetingRepository::list_by_alert_id(conn, &alert_id)?))
            .await
    }

    async fn list(&self, limit: usize) -> Result<Vec<Meeting>, StoreError> {
        self.with_conn(move |conn| Ok(MeetingRepository::list(conn, limit)?))
            .await
    }

    async fn update(&self, id: &str, patch: MeetingPatch) -> Result<(), StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let updated = MeetingRepository::update(conn, &id, &patch)?;
            if updated == 0 {
                return Err(StoreError::MeetingNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            MeetingRepository::remove(conn, &id)?;
            Ok(())
        })
        .await
    }
}
