//! # tareas - personal task tracker
//!
//! A small console task manager. Tasks have a name, a description, a category
//! (personal, work or leisure) and a high-priority flag, and are kept in a flat
//! text file with one `id;name;description;category;highPriority` line each.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive menu (create, find by category, delete, export, import)
//! tareas
//!
//! # One-shot commands
//! tareas add "Finish report" --category trabajo --high
//! tareas list --category work
//! tareas delete 2
//! ```
//!
//! The task file defaults to `./tareas.txt`; override it with `--file` or the
//! `TAREAS_FILE` environment variable. Logs go to stderr and follow `RUST_LOG`
//! or the `-v` flag.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tareas::cli::Cli;
use tareas::cmd::*;
use tareas::config::{log_directive, Settings};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::resolve(cli.file);
    tracing::debug!(file = %settings.task_file.display(), "using task file");

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd_menu(&settings),
        Commands::Add { name, desc, category, high } => cmd_add(&settings, name, desc, category, high),
        Commands::List { category, json } => cmd_list(&settings, category, json),
        Commands::Delete { id } => cmd_delete(&settings, id),
        Commands::Export { output } => cmd_export(&settings, &output),
        Commands::Import { input, no_backup } => cmd_import(&settings, &input, no_backup),
        Commands::Backup => cmd_backup(&settings),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
