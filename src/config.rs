//! Runtime settings: where the task file lives and where backups go.

use std::path::{Path, PathBuf};

/// Task file used when neither `--file` nor `TAREAS_FILE` is given.
pub const DEFAULT_TASK_FILE: &str = "tareas.txt";

/// Environment variable consulted for the task file path.
pub const TASK_FILE_ENV: &str = "TAREAS_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub task_file: PathBuf,
    pub backup_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from the (already env-merged) `--file` option.
    pub fn resolve(file: Option<PathBuf>) -> Self {
        let task_file = file.unwrap_or_else(|| PathBuf::from(DEFAULT_TASK_FILE));
        let backup_dir = backup_dir_for(&task_file);
        Settings {
            task_file,
            backup_dir,
        }
    }
}

/// Backups sit in a `backup/` directory next to the task file.
fn backup_dir_for(task_file: &Path) -> PathBuf {
    match task_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.join("backup"),
        _ => PathBuf::from("backup"),
    }
}

/// Tracing filter directive for the given `-v` count.
pub fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "tareas=warn",
        1 => "tareas=info",
        2 => "tareas=debug",
        _ => "tareas=trace",
    }
}
