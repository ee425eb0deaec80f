//! Meeting record persistence.
//!
//! CRUD over the `meetings` table — raw SQL with rusqlite, no ORM.
//! Partial updates build their SET clause dynamically so unset patch
//! fields are never touched.

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, Row};

use crate::meeting::{Meeting, MeetingPatch};

/// Repository for meeting records.
pub struct MeetingRepository;

const MEETING_COLUMNS: &str = "id, alert_id, capture_pipeline_arn, concat_pipeline_arn, \
     created_at, concatenated_at, summarized_at";

fn meeting_from_row(row: &Row) -> rusqlite::Result<Meeting> {
    Ok(Meeting {
        id: row.get(0)?,
        alert_id: row.get(1)?,
        capture_pipeline_arn: row.get(2)?,
        concat_pipeline_arn: row.get(3)?,
        created_at: row.get(4)?,
        concatenated_at: row.get(5)?,
        summarized_at: row.get(6)?,
    })
}

impl MeetingRepository {
    /// Insert a new meeting record.
    pub fn insert(conn: &Connection, meeting: &Meeting) -> Result<()> {
        conn.execute(
            "INSERT INTO meetings (id, alert_id, capture_pipeline_arn, concat_pipeline_arn, \
             created_at, concatenated_at, summarized_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                meeting.id,
                meeting.alert_id,
                meeting.capture_pipeline_arn,
                meeting.concat_pipeline_arn,
                meeting.created_at,
                meeting.concatenated_at,
                meeting.summarized_at,
            ],
        )
        .context("Failed to insert meeting")?;

        Ok(())
    }

    /// Get a meeting by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<Meeting>> {
        let sql = format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?1");
        let mut stmt = conn
            .prepare(&sql)
            .context("Failed to prepare meeting query")?;

        let mut rows = stmt
            .query_map(params![id], meeting_from_row)
            .context("Failed to query meeting")?;

        match rows.next() {
            Some(Ok(meeting)) => Ok(Some(meeting)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// All meetings recorded against one alert, newest first.
    pub fn list_by_alert_id(conn: &Connection, alert_id: &str) -> Result<Vec<Meeting>> {
        let sql = format!(
            "SELECT {MEETING_COLUMNS} FROM meetings \
             WHERE alert_id = ?1 ORDER BY created_at DESC, id DESC"
        );
        let mut stmt = conn
            .prepare(&sql)
            .context("Failed to prepare alert meetings query")?;

        let rows = stmt
            .query_map(params![alert_id], meeting_from_row)
            .context("Failed to query meetings by alert")?;

        let mut meetings = Vec::new();
        for row in rows {
            meetings.push(row?);
        }

        Ok(meetings)
    }

    /// List meetings, newest first.
    pub fn list(conn: &Connection, limit: usize) -> Result<Vec<Meeting>> {
        let sql = format!(
            "SELECT {MEETING_COLUMNS} FROM meetings \
             ORDER BY created_at DESC, id DESC LIMIT ?1"
        );
        let mut stmt = conn
            .prepare(&sql)
            .context("Failed to prepare meetings list query")?;

        let rows = stmt
            .query_map(params![limit as i64], meeting_from_row)
            .context("Failed to list meetings")?;

        let mut meetings = Vec::new();
        for row in rows {
            meetings.push(row?);
        }

        Ok(meetings)
    }

    /// Apply a partial update. Returns the number of affected rows
    /// (0 when no such meeting exists).
    pub fn update(conn: &Connection, id: &str, patch: &MeetingPatch) -> Result<usize> {
        if patch.is_empty() {
            bail!("Refusing to update meeting {} with an empty patch", id);
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(concatenated_at) = &patch.concatenated_at {
            assignments.push("concatenated_at = ?");
            values.push(Box::new(concatenated_at.clone()));
        }

        if let Some(summarized_at) = &patch.summarized_at {
            assignments.push("summarized_at = ?");
            values.push(Box::new(summarized_at.clone()));
        }

        let sql = format!(
            "UPDATE meetings SET {} WHERE id = ?",
            assignments.join(", ")
        );
        values.push(Box::new(id.to_string()));

        let value_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();

        let updated = conn
            .execute(&sql, value_refs.as_slice())
            .context("Failed to update meeting")?;

        Ok(updated)
    }

    /// Delete a meeting by ID.
    pub fn remove(conn: &Connection, id: &str) -> Result<()> {
        conn.execute("DELETE FROM meetings WHERE id = ?1", params![id])
            .context("Failed to delete meeting")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    fn sample(id: &str, alert_id: &str, created_at: &str) -> Meeting {
        Meeting {
            id: id.to_string(),
            alert_id: alert_id.to_string(),
            capture_pipeline_arn: "arn:capture".to_string(),
            concat_pipeline_arn: "arn:concat".to_string(),
            created_at: created_at.to_string(),
            concatenated_at: None,
            summarized_at: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let conn = setup_db();
        MeetingRepository::insert(&conn, &sample("m1", "a1", "2025-01-01T00:00:00Z")).unwrap();

        let meeting = MeetingRepository::get(&conn, "m1").unwrap().unwrap();
        assert_eq!(meeting.id, "m1");
        assert_eq!(meeting.alert_id, "a1");
        assert_eq!(meeting.created_at, "2025-01-01T00:00:00Z");
        assert!(meeting.concatenated_at.is_none());
        assert!(meeting.summarized_at.is_none());
    }

    #[test]
    fn test_get_nonexistent() {
        let conn = setup_db();
        assert!(MeetingRepository::get(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let conn = setup_db();
        let meeting = sample("m1", "a1", "2025-01-01T00:00:00Z");
        MeetingRepository::insert(&conn, &meeting).unwrap();
        assert!(MeetingRepository::insert(&conn, &meeting).is_err());
    }

    #[test]
    fn test_update_single_field() {
        let conn = setup_db();
        MeetingRepository::insert(&conn, &sample("m1", "a1", "2025-01-01T00:00:00Z")).unwrap();

        let updated = MeetingRepository::update(
            &conn,
            "m1",
            &MeetingPatch::concatenated_at("2025-01-01T01:00:00Z"),
        )
        .unwrap();
        assert_eq!(updated, 1);

        let meeting = MeetingRepository::get(&conn, "m1").unwrap().unwrap();
        assert_eq!(
            meeting.concatenated_at.as_deref(),
            Some("2025-01-01T01:00:00Z")
        );
        assert!(meeting.summarized_at.is_none());
    }

    #[test]
    fn test_update_both_fields() {
        let conn = setup_db();
        MeetingRepository::insert(&conn, &sample("m1", "a1", "2025-01-01T00:00:00Z")).unwrap();

        let patch = MeetingPatch {
            concatenated_at: Some("2025-01-01T01:00:00Z".to_string()),
            summarized_at: Some("2025-01-01T02:00:00Z".to_string()),
        };
        MeetingRepository::update(&conn, "m1", &patch).unwrap();

        let meeting = MeetingRepository::get(&conn, "m1").unwrap().unwrap();
        assert!(meeting.concatenated_at.is_some());
        assert!(meeting.summarized_at.is_some());
    }

    #[test]
    fn test_update_missing_returns_zero() {
        let conn = setup_db();
        let updated = MeetingRepository::update(
            &conn,
            "ghost",
            &MeetingPatch::concatenated_at("2025-01-01T01:00:00Z"),
        )
        .unwrap();
        assert_eq!(updated, 0);
    }

    #[test]
    fn test_update_empty_patch_is_error() {
        let conn = setup_db();
        MeetingRepository::insert(&conn, &sample("m1", "a1", "2025-01-01T00:00:00Z")).unwrap();
        assert!(MeetingRepository::update(&conn, "m1", &MeetingPatch::default()).is_err());
    }

    #[test]
    fn test_list_by_alert_id() {
        let conn = setup_db();
        MeetingRepository::insert(&conn, &sample("m1", "a1", "2025-01-01T00:00:00Z")).unwrap();
        MeetingRepository::insert(&conn, &sample("m2", "a1", "2025-01-02T00:00:00Z")).unwrap();
        MeetingRepository::insert(&conn, &sample("m3", "a2", "2025-01-03T00:00:00Z")).unwrap();

        let meetings = MeetingRepository::list_by_alert_id(&conn, "a1").unwrap();
        assert_eq!(meetings.len(), 2);
        // Newest first
        assert_eq!(meetings[0].id, "m2");
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let conn = setup_db();
        MeetingRepository::insert(&conn, &sample("m1", "a1", "2025-01-01T00:00:00Z")).unwrap();
        MeetingRepository::insert(&conn, &sample("m2", "a1", "2025-01-02T00:00:00Z")).unwrap();
        MeetingRepository::insert(&conn, &sample("m3", "a1", "2025-01-03T00:00:00Z")).unwrap();

        let meetings = MeetingRepository::list(&conn, 2).unwrap();
        assert_eq!(meetings.len(), 2);
        assert_eq!(meetings[0].id, "m3");
        assert_eq!(meetings[1].id, "m2");
    }

    #[test]
    fn test_remove() {
        let conn = setup_db();
        MeetingRepository::insert(&conn, &sample("m1", "a1", "2025-01-01T00:00:00Z")).unwrap();
        MeetingRepository::remove(&conn, "m1").unwrap();
        assert!(MeetingRepository::get(&conn, "m1").unwrap().is_none());
    }
}
