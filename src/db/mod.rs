use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub mod meetings;

/// Open a connection to the database at `path`, creating the parent
/// directory if needed.
pub fn open(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let conn = Connection::open(path).context("Failed to open database connection")?;

    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS meetings (
            id TEXT PRIMARY KEY,
            alert_id TEXT NOT NULL,
            capture_pipeline_arn TEXT NOT NULL DEFAULT '',
            concat_pipeline_arn TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            concatenated_at TEXT,
            summarized_at TEXT
        )",
        [],
    )
    .context("Failed to create meetings table")?;

    // Reverse lookup: all meetings recorded against one alert
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_alert_id ON meetings(alert_id)",
        [],
    )
    .context("Failed to create index on alert_id")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_created_at ON meetings(created_at DESC)",
        [],
    )
    .context("Failed to create index on created_at")?;

    Ok(())
}
