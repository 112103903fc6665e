//! Command implementations for the CLI interface.
//!
//! Each non-interactive subcommand loads the task file, performs one store
//! operation and, when it changed anything, writes the file back. The `menu`
//! subcommand hands the loaded store to the interactive [`MenuApp`].

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::{info, warn};

use crate::config::Settings;
use crate::fields::{format_priority, Category};
use crate::menu::MenuApp;
use crate::store::{StoreError, TaskStore};
use crate::task::Task;

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive menu.
    Menu,

    /// Add a new task.
    Add {
        /// Short name for the task.
        name: String,
        /// Optional longer description.
        #[arg(long, default_value = "")]
        desc: String,
        /// Category: personal (persona) | work (trabajo) | leisure (ocio).
        #[arg(long, value_enum, ignore_case = true)]
        category: Category,
        /// Mark the task as high priority.
        #[arg(long)]
        high: bool,
    },

    /// List tasks, optionally only one category.
    List {
        /// Filter by category.
        #[arg(long, value_enum, ignore_case = true)]
        category: Option<Category>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Delete a task by ID.
    Delete {
        /// Task ID to delete.
        id: u32,
    },

    /// Write all tasks to another file in the task file format.
    Export {
        /// Output file path.
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Append tasks from another task file.
    Import {
        /// Input file path.
        input: PathBuf,
        /// Skip creating backup before import.
        #[arg(long)]
        no_backup: bool,
    },

    /// Create a timestamped backup of the task file.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn load(settings: &Settings) -> Result<TaskStore> {
    let (store, _) = TaskStore::open(&settings.task_file)
        .with_context(|| format!("Failed to load {}", settings.task_file.display()))?;
    Ok(store)
}

fn save(store: &TaskStore, settings: &Settings) -> Result<()> {
    store
        .save_to_file(&settings.task_file)
        .with_context(|| format!("Failed to save {}", settings.task_file.display()))
}

/// Launch the interactive menu on stdin/stdout.
pub fn cmd_menu(settings: &Settings) -> Result<()> {
    let (store, load_failed) = match TaskStore::open(&settings.task_file) {
        Ok((store, _)) => (store, false),
        Err(e) => {
            warn!("starting with an empty task list: {e}");
            eprintln!("Could not load tasks: {e}");
            eprintln!("Export is disabled until the file is imported successfully.");
            (TaskStore::new(), true)
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let clear = stdout.is_terminal();
    let mut app = MenuApp::new(store, settings.task_file.clone(), stdin.lock(), stdout.lock())
        .with_clear_screen(clear)
        .with_load_failed(load_failed);
    app.run().context("Console I/O failed")?;
    info!(tasks = app.store().len(), "menu closed");
    Ok(())
}

/// Add a new task and save.
pub fn cmd_add(
    settings: &Settings,
    name: String,
    desc: String,
    category: Category,
    high: bool,
) -> Result<()> {
    let mut store = load(settings)?;
    let id = store.create(name, desc, category, high).id;
    save(&store, settings)?;
    println!("Added task {id}");
    Ok(())
}

/// Print tasks as a table or JSON.
pub fn cmd_list(settings: &Settings, category: Option<Category>, json: bool) -> Result<()> {
    let store = load(settings)?;
    let tasks: Vec<&Task> = match category {
        Some(c) => store.find_by_category(c).collect(),
        None => store.tasks().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        print_table(&tasks);
    }
    Ok(())
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!("{:<5} {:<9} {:<5} {}", "ID", "Category", "Pri", "Name | Description");
    for t in tasks {
        println!(
            "{:<5} {:<9} {:<5} {} | {}",
            t.id,
            t.category,
            format_priority(t.high_priority),
            t.name,
            t.description
        );
    }
}

/// Delete a task by ID and save.
pub fn cmd_delete(settings: &Settings, id: u32) -> Result<()> {
    let mut store = load(settings)?;
    match store.delete_by_id(id) {
        Ok(task) => {
            save(&store, settings)?;
            println!("Deleted {} - {}", task.id, task.name);
            Ok(())
        }
        Err(StoreError::NotFound(id)) => bail!("Task {id} not found."),
        Err(e) => Err(e.into()),
    }
}

/// Export all tasks to `output`.
pub fn cmd_export(settings: &Settings, output: &Path) -> Result<()> {
    let store = load(settings)?;
    store
        .save_to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Exported {} task(s) to {}", store.len(), output.display());
    Ok(())
}

/// Append tasks from `input` into the task file, backing it up first.
pub fn cmd_import(settings: &Settings, input: &Path, no_backup: bool) -> Result<()> {
    if !no_backup && settings.task_file.exists() {
        let backup_path = create_backup(settings)?;
        println!("Created backup: {}", backup_path.display());
    }

    let mut store = load(settings)?;
    let report = store
        .load_from_file(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    if !report.file_found {
        bail!("File {} does not exist.", input.display());
    }
    save(&store, settings)?;
    println!(
        "Import completed. {} task(s) imported, {} skipped.",
        report.loaded, report.skipped
    );
    Ok(())
}

/// Create a timestamped copy of the task file in the backup directory.
pub fn create_backup(settings: &Settings) -> Result<PathBuf> {
    let task_file = &settings.task_file;
    if !task_file.exists() {
        bail!("Task file {} does not exist", task_file.display());
    }

    fs::create_dir_all(&settings.backup_dir)
        .with_context(|| format!("Failed to create {}", settings.backup_dir.display()))?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let file_name = task_file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("tareas.txt");
    let backup_path = settings.backup_dir.join(format!("{timestamp}_{file_name}"));

    fs::copy(task_file, &backup_path)
        .with_context(|| format!("Failed to copy to {}", backup_path.display()))?;
    info!(path = %backup_path.display(), "backup created");
    Ok(backup_path)
}

/// Create a backup command implementation.
pub fn cmd_backup(settings: &Settings) -> Result<()> {
    let backup_path = create_backup(settings)?;
    println!("Backup created: {}", backup_path.display());
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}
