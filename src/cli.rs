use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::TASK_FILE_ENV;

/// Personal task tracker backed by a flat text file.
/// Storage defaults to ./tareas.txt or a path passed via --file.
#[derive(Parser)]
#[command(name = "tareas", version, about = "Personal task tracker")]
pub struct Cli {
    /// Path to the task file.
    #[arg(long, global = true, env = TASK_FILE_ENV)]
    pub file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Runs the interactive menu when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
