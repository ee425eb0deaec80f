//! CLI handler for the `process` command.
//!
//! Drives the full pipeline for one meeting in the foreground, without
//! the service running. Useful for reprocessing a call after a failed
//! run or for working through a backlog.

use anyhow::{bail, Result};

use crate::app;
use crate::cli::args::ProcessCliArgs;
use crate::config::Config;
use crate::pipeline::{PipelineEventDetail, RunOutcome, RunRegistry};

pub async fn handle_process_command(args: ProcessCliArgs) -> Result<()> {
    let config = Config::load()?;
    let pipeline = app::build_pipeline(&config)?;

    let registry = RunRegistry::default();
    let handle = registry.register(&args.meeting_id, &args.pipeline_id).await;
    let event = PipelineEventDetail::deletion(&args.meeting_id, &args.pipeline_id);

    println!(
        "Processing meeting {} (pipeline {})",
        args.meeting_id, args.pipeline_id
    );

    match pipeline.run(&event, &handle).await? {
        RunOutcome::Completed => {
            println!("Summary stored and knowledge index refreshed.");
            Ok(())
        }
        RunOutcome::Skipped => {
            println!("No composited video found; treated as a capture pipeline deletion.");
            Ok(())
        }
        RunOutcome::Failed { reason } => bail!("Run failed: {reason}"),
    }
}
