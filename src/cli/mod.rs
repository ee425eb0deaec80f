//! Command-line interface.

pub mod args;
pub mod meetings;
pub mod process;

pub use args::{Cli, CliCommand};
pub use meetings::handle_meetings_command;
pub use process::handle_process_command;
