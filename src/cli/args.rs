use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "handover")]
#[command(
    about = "Turns recorded expert calls into transcripts, summaries, and knowledge-base content",
    long_about = None
)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the summary pipeline for one meeting in the foreground
    Process(ProcessCliArgs),
    /// Inspect and manage meeting records
    Meetings(MeetingsCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct ProcessCliArgs {
    /// Meeting the recorded call belongs to
    #[arg(long)]
    pub meeting_id: String,
    /// Media pipeline named in the deletion event
    #[arg(long)]
    pub pipeline_id: String,
}

#[derive(ClapArgs, Debug)]
pub struct MeetingsCliArgs {
    #[command(subcommand)]
    pub command: MeetingsCommand,
}

#[derive(Subcommand, Debug)]
pub enum MeetingsCommand {
    /// List meetings, newest first
    List {
        /// Only meetings recorded against this alert
        #[arg(long)]
        alert_id: Option<String>,
        /// Maximum number of results to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show one meeting with its derived pipeline status
    Show { id: String },
    /// Create a meeting record (normally done by the calling system)
    Create {
        id: String,
        #[arg(long)]
        alert_id: String,
        #[arg(long, default_value = "")]
        capture_pipeline_arn: String,
        #[arg(long, default_value = "")]
        concat_pipeline_arn: String,
    },
}
