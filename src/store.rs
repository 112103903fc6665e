//! In-memory task store and its flat-file format.
//!
//! The `TaskStore` owns every task in insertion order together with the id
//! allocator. It is persisted as one line per task:
//!
//! ```text
//! id;name;description;category;highPriority
//! ```
//!
//! Fields are not escaped, so a `;` inside a name or description breaks that
//! line on the next load (it is then ignored for having the wrong field count).

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::fields::{format_bool, parse_bool, Category, ParseBoolError, ParseCategoryError};
use crate::task::Task;

const DELIMITER: char = ';';
const FIELD_COUNT: usize = 5;

/// Largest id accepted from a task file. Keeps the allocator far from `u32::MAX`.
pub const MAX_FILE_ID: u32 = i32::MAX as u32;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(u32),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Why a single line of the task file was not turned into a task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid id '{0}'")]
    Id(String),

    #[error(transparent)]
    Category(#[from] ParseCategoryError),

    #[error(transparent)]
    Priority(#[from] ParseBoolError),
}

/// Outcome of reading a task file into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// False when the file did not exist; the store is left untouched.
    pub file_found: bool,
    pub loaded: usize,
    /// Lines without exactly five fields, blank lines included.
    pub ignored: usize,
    /// Five-field lines with an unreadable field or an id already in the store.
    pub skipped: usize,
}

/// Ordered collection of tasks plus the id allocator.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u32,
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore {
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the task file, treating a missing file as empty.
    pub fn open(path: &Path) -> Result<(Self, LoadReport), StoreError> {
        let mut store = TaskStore::new();
        let report = store.load_from_file(path)?;
        Ok((store, report))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The id the next call to `create` will assign.
    pub fn next_id(&self) -> u32 {
        let max = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        self.next_id.max(max.saturating_add(1))
    }

    /// Append a new task under a freshly allocated id.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        high_priority: bool,
    ) -> &Task {
        let id = self.next_id();
        self.next_id = id.saturating_add(1);
        self.tasks.push(Task {
            id,
            name: name.into(),
            description: description.into(),
            category,
            high_priority,
        });
        debug!(id, "created task");
        &self.tasks[self.tasks.len() - 1]
    }

    /// Tasks of the given category, in insertion order.
    pub fn find_by_category(&self, category: Category) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |t| t.category == category)
    }

    /// Remove the task with `id`, returning it.
    pub fn delete_by_id(&mut self, id: u32) -> Result<Task, StoreError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        debug!(id, "deleted task");
        Ok(self.tasks.remove(idx))
    }

    /// Append the tasks stored at `path`.
    ///
    /// A missing file is not an error. Malformed lines are skipped rather than
    /// aborting the load, and so are records whose id is already held. After
    /// each accepted record the allocator moves to that record's id + 1.
    pub fn load_from_file(&mut self, path: &Path) -> Result<LoadReport, StoreError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "task file not found, nothing to load");
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let mut report = LoadReport {
            file_found: true,
            ..LoadReport::default()
        };
        for (line_num, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let raw = raw.map_err(|e| StoreError::io(path, e))?;
            let line_num = line_num + 1;
            // Non-UTF-8 bytes (e.g. Latin-1 accents) become U+FFFD.
            let line = String::from_utf8_lossy(&raw);
            match parse_line(&line) {
                Ok(task) => {
                    if self.get(task.id).is_some() {
                        warn!(line = line_num, id = task.id, "duplicate task id, skipping");
                        report.skipped += 1;
                        continue;
                    }
                    self.next_id = task.id.saturating_add(1);
                    self.tasks.push(task);
                    report.loaded += 1;
                }
                Err(LineError::FieldCount(n)) => {
                    debug!(line = line_num, fields = n, "ignoring line");
                    report.ignored += 1;
                }
                Err(e) => {
                    warn!(line = line_num, "skipping unreadable task: {e}");
                    report.skipped += 1;
                }
            }
        }

        info!(
            path = %path.display(),
            loaded = report.loaded,
            ignored = report.ignored,
            skipped = report.skipped,
            "loaded task file"
        );
        Ok(report)
    }

    /// Overwrite `path` with every task, in store order.
    pub fn save_to_file(&self, path: &Path) -> Result<(), StoreError> {
        // Write a sibling temp file, then rename over the target.
        let tmp = temp_path(path);
        let write = || -> io::Result<()> {
            let mut w = BufWriter::new(File::create(&tmp)?);
            for task in &self.tasks {
                writeln!(w, "{}", format_line(task))?;
            }
            w.into_inner().map_err(|e| e.into_error())?.sync_all()
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(path, e));
        }
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StoreError::io(path, e)
        })?;
        info!(path = %path.display(), count = self.tasks.len(), "saved task file");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".tmp");
    PathBuf::from(s)
}

/// Render one task as a line of the task file, without the newline.
pub fn format_line(task: &Task) -> String {
    format!(
        "{id}{d}{name}{d}{desc}{d}{cat}{d}{prio}",
        id = task.id,
        name = task.name,
        desc = task.description,
        cat = task.category.token(),
        prio = format_bool(task.high_priority),
        d = DELIMITER,
    )
}

/// Parse one line of the task file.
pub fn parse_line(line: &str) -> Result<Task, LineError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    if parts.len() != FIELD_COUNT {
        return Err(LineError::FieldCount(parts.len()));
    }

    let id = match parts[0].trim().parse::<u32>() {
        Ok(id) if id > 0 && id <= MAX_FILE_ID => id,
        _ => return Err(LineError::Id(parts[0].to_string())),
    };

    Ok(Task {
        id,
        name: parts[1].to_string(),
        description: parts[2].to_string(),
        category: parts[3].parse()?,
        high_priority: parse_bool(parts[4])?,
    })
}
