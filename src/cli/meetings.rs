//! CLI handlers for meeting record commands.
//!
//! These go straight to the database, so they work whether or not the
//! service is running.

use anyhow::Result;
use chrono::{SecondsFormat, Utc};

use crate::cli::args::{MeetingsCliArgs, MeetingsCommand};
use crate::config::Config;
use crate::meeting::{Meeting, MeetingStore, SqliteMeetingStore};

pub async fn handle_meetings_command(args: MeetingsCliArgs) -> Result<()> {
    let config = Config::load()?;
    let store = SqliteMeetingStore::new(config.db_path()?)?;

    match args.command {
        MeetingsCommand::List { alert_id, limit } => list_meetings(&store, alert_id, limit).await,
        MeetingsCommand::Show { id } => show_meeting(&store, &id).await,
        MeetingsCommand::Create {
            id,
            alert_id,
            capture_pipeline_arn,
            concat_pipeline_arn,
        } => {
            create_meeting(
                &store,
                id,
                alert_id,
                capture_pipeline_arn,
                concat_pipeline_arn,
            )
            .await
        }
    }
}

async fn list_meetings(
    store: &SqliteMeetingStore,
    alert_id: Option<String>,
    limit: usize,
) -> Result<()> {
    let meetings = match alert_id {
        Some(alert_id) => store.find_all_by_alert_id(&alert_id).await?,
        None => store.list(limit).await?,
    };

    if meetings.is_empty() {
        println!("No meetings recorded yet.");
        return Ok(());
    }

    for meeting in meetings {
        println!(
            "{} [{}] alert {} - created {}",
            meeting.id,
            meeting.status().as_str(),
            meeting.alert_id,
            meeting.created_at
        );
    }

    Ok(())
}

async fn show_meeting(store: &SqliteMeetingStore, id: &str) -> Result<()> {
    let meeting = store.find_by_id(id).await?;

    println!("Meeting {}", meeting.id);
    println!("Status: {}", meeting.status().as_str());
    println!("Alert: {}", meeting.alert_id);
    println!("Created: {}", meeting.created_at);
    println!(
        "Concatenated: {}",
        meeting.concatenated_at.as_deref().unwrap_or("-")
    );
    println!(
        "Summarized: {}",
        meeting.summarized_at.as_deref().unwrap_or("-")
    );

    Ok(())
}

async fn create_meeting(
    store: &SqliteMeetingStore,
    id: String,
    alert_id: String,
    capture_pipeline_arn: String,
    concat_pipeline_arn: String,
) -> Result<()> {
    let meeting = Meeting {
        id: id.clone(),
        alert_id,
        capture_pipeline_arn,
        concat_pipeline_arn,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        concatenated_at: None,
        summarized_at: None,
    };

    store.create(meeting).await?;
    println!("Created meeting {}", id);

    Ok(())
}
