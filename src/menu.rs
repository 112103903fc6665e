//! Interactive numbered menu over a [`TaskStore`].
//!
//! The menu owns the store for the whole session and reads from any `BufRead`
//! and writes to any `Write`, so the binary drives it with stdin/stdout while
//! tests drive it with scripted input.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tracing::{debug, error};

use crate::fields::{parse_bool, Category};
use crate::store::TaskStore;

const CATEGORY_PROMPT: &str = "Category (persona, trabajo, ocio): ";
const PRIORITY_PROMPT: &str = "High priority (true/false): ";
const ID_PROMPT: &str = "Id of the task to delete: ";

/// Whether the menu loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Console session state.
pub struct MenuApp<R, W> {
    store: TaskStore,
    task_file: PathBuf,
    input: R,
    output: W,
    clear_screen: bool,
    /// Set when the startup load failed; export would overwrite unread tasks.
    load_failed: bool,
}

impl<R: BufRead, W: Write> MenuApp<R, W> {
    pub fn new(store: TaskStore, task_file: PathBuf, input: R, output: W) -> Self {
        MenuApp {
            store,
            task_file,
            input,
            output,
            clear_screen: false,
            load_failed: false,
        }
    }

    /// Mark the task file as unread so export refuses to overwrite it.
    pub fn with_load_failed(mut self, failed: bool) -> Self {
        self.load_failed = failed;
        self
    }

    /// Clear the terminal before each menu render.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn into_store(self) -> TaskStore {
        self.store
    }

    /// Run until the user picks `0` or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.render_menu()?;
            let Some(choice) = self.read_line()? else {
                return Ok(());
            };
            debug!(choice = %choice.trim(), "menu choice");
            let flow = match choice.trim() {
                "1" => self.create_task()?,
                "2" => self.find_by_category()?,
                "3" => self.delete_task()?,
                "4" => self.export_tasks()?,
                "5" => self.import_tasks()?,
                "0" => Flow::Exit,
                _ => {
                    writeln!(self.output, "Invalid option.")?;
                    self.pause()?
                }
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn render_menu(&mut self) -> io::Result<()> {
        self.clear()?;
        writeln!(self.output, "Personal Task Manager")?;
        writeln!(self.output, "1. Create task")?;
        writeln!(self.output, "2. Find tasks by category")?;
        writeln!(self.output, "3. Delete task")?;
        writeln!(self.output, "4. Export tasks")?;
        writeln!(self.output, "5. Import tasks")?;
        writeln!(self.output, "0. Exit")?;
        write!(self.output, "Choose an option: ")?;
        self.output.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    /// Read one line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    fn prompt(&mut self, msg: &str) -> io::Result<Option<String>> {
        write!(self.output, "{msg}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompt until `parse` accepts the answer.
    fn prompt_until<T, E>(
        &mut self,
        msg: &str,
        retry: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(msg)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(v) => return Ok(Some(v)),
                Err(_) => writeln!(self.output, "{retry}")?,
            }
        }
    }

    /// Wait for Enter before going back to the menu.
    fn pause(&mut self) -> io::Result<Flow> {
        Ok(match self.read_line()? {
            Some(_) => Flow::Continue,
            None => Flow::Exit,
        })
    }

    fn create_task(&mut self) -> io::Result<Flow> {
        self.clear()?;
        let Some(name) = self.prompt("Task name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(description) = self.prompt("Task description: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(category) = self.prompt_until(
            CATEGORY_PROMPT,
            "Invalid category, it must be 'persona', 'trabajo' or 'ocio'. Try again.",
            str::parse::<Category>,
        )?
        else {
            return Ok(Flow::Exit);
        };
        let Some(high_priority) = self.prompt_until(
            PRIORITY_PROMPT,
            "Invalid value. Please enter 'true' or 'false'.",
            parse_bool,
        )?
        else {
            return Ok(Flow::Exit);
        };

        let id = self.store.create(name, description, category, high_priority).id;
        writeln!(self.output, "Task {id} created.")?;
        self.pause()
    }

    fn find_by_category(&mut self) -> io::Result<Flow> {
        self.clear()?;
        let Some(category) = self.prompt_until(
            CATEGORY_PROMPT,
            "Invalid category. Try again.",
            str::parse::<Category>,
        )?
        else {
            return Ok(Flow::Exit);
        };

        writeln!(self.output, "{category} tasks:")?;
        for task in self.store.find_by_category(category) {
            writeln!(self.output, "{task}")?;
        }
        self.pause()
    }

    fn delete_task(&mut self) -> io::Result<Flow> {
        self.clear()?;
        let Some(id) = self.prompt_until(
            ID_PROMPT,
            "Invalid id, it must be a whole number. Try again.",
            |s| s.trim().parse::<u32>(),
        )?
        else {
            return Ok(Flow::Exit);
        };

        match self.store.delete_by_id(id) {
            Ok(task) => writeln!(self.output, "Task {} deleted.", task.id)?,
            Err(e) => writeln!(self.output, "Could not delete: {e}.")?,
        }
        self.pause()
    }

    fn export_tasks(&mut self) -> io::Result<Flow> {
        self.clear()?;
        if self.load_failed {
            writeln!(
                self.output,
                "Export refused: {} could not be read at startup and would be overwritten. \
                 Import it successfully first.",
                self.task_file.display()
            )?;
            return self.pause();
        }
        match self.store.save_to_file(&self.task_file) {
            Ok(()) => writeln!(
                self.output,
                "Exported {} task(s) to {}",
                self.store.len(),
                self.task_file.display()
            )?,
            Err(e) => {
                error!("export failed: {e}");
                writeln!(self.output, "Export failed: {e}")?;
            }
        }
        self.pause()
    }

    fn import_tasks(&mut self) -> io::Result<Flow> {
        self.clear()?;
        match self.store.load_from_file(&self.task_file) {
            Ok(report) if !report.file_found => {
                writeln!(self.output, "The task file does not exist.")?
            }
            Ok(report) => {
                self.load_failed = false;
                write!(self.output, "Imported {} task(s)", report.loaded)?;
                if report.skipped > 0 {
                    write!(self.output, ", {} skipped", report.skipped)?;
                }
                writeln!(self.output, ".")?;
            }
            Err(e) => {
                error!("import failed: {e}");
                writeln!(self.output, "Import failed: {e}")?;
            }
        }
        self.pause()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(store: TaskStore, file: PathBuf, script: &str) -> (TaskStore, String) {
        let mut out = Vec::new();
        let mut app = MenuApp::new(store, file, Cursor::new(script.as_bytes().to_vec()), &mut out);
        app.run().unwrap();
        let store = app.into_store();
        (store, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_create_reprompts_invalid_category_and_bool() {
        let dir = tempfile::tempdir().unwrap();
        let script = "1\nBuy milk\n\nhobby\nPERSONA\nyes\nfalse\n\n0\n";
        let (store, out) = run_script(TaskStore::new(), dir.path().join("t.txt"), script);

        assert_eq!(store.len(), 1);
        let task = &store.tasks()[0];
        assert_eq!(task.name, "Buy milk");
        assert_eq!(task.category, Category::Personal);
        assert!(!task.high_priority);
        assert!(out.contains("Invalid category"));
        assert!(out.contains("Invalid value"));
        assert!(out.contains("Task 1 created."));
    }

    #[test]
    fn test_find_lists_only_matching_category() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TaskStore::new();
        store.create("Buy milk", "", Category::Personal, false);
        store.create("Finish report", "q3", Category::Work, true);
        let (_, out) = run_script(store, dir.path().join("t.txt"), "2\ntrabajo\n\n0\n");

        assert!(out.contains("Work tasks:"));
        assert!(out.contains("2 - Finish report | q3 | Work | High"));
        assert!(!out.contains("Buy milk |"));
    }

    #[test]
    fn test_delete_unknown_id_returns_to_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TaskStore::new();
        store.create("a", "", Category::Leisure, false);
        let (store, out) = run_script(store, dir.path().join("t.txt"), "3\nabc\n9\n\n3\n1\n\n0\n");

        assert!(out.contains("Invalid id"));
        assert!(out.contains("task 9 not found"));
        assert!(out.contains("Task 1 deleted."));
        assert!(store.is_empty());
    }

    #[test]
    fn test_export_then_import_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tareas.txt");
        let mut store = TaskStore::new();
        store.create("a", "x", Category::Work, true);
        let (_, out) = run_script(store, file.clone(), "4\n\n0\n");
        assert!(out.contains("Exported 1 task(s)"));

        let (store, out) = run_script(TaskStore::new(), file, "5\n\n0\n");
        assert!(out.contains("Imported 1 task(s)."));
        assert_eq!(store.tasks()[0].name, "a");
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (store, out) = run_script(TaskStore::new(), dir.path().join("none.txt"), "5\n\n0\n");
        assert!(out.contains("does not exist"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_export_refused_after_failed_startup_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tareas.txt");
        std::fs::write(&file, "1;keep me;;Ocio;False\n").unwrap();

        let mut out = Vec::new();
        let script = Cursor::new(b"4\n\n0\n".to_vec());
        let mut app = MenuApp::new(TaskStore::new(), file.clone(), script, &mut out)
            .with_load_failed(true);
        app.run().unwrap();
        drop(app);

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Export refused"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "1;keep me;;Ocio;False\n");
    }

    #[test]
    fn test_successful_import_allows_export_again() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tareas.txt");
        std::fs::write(&file, "1;keep me;;Ocio;False\n").unwrap();

        let mut out = Vec::new();
        let script = Cursor::new(b"5\n\n4\n\n0\n".to_vec());
        let mut app = MenuApp::new(TaskStore::new(), file.clone(), script, &mut out)
            .with_load_failed(true);
        app.run().unwrap();
        assert_eq!(app.store().len(), 1);
        drop(app);

        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("Export refused"));
        assert!(out.contains("Exported 1 task(s)"));
    }

    #[test]
    fn test_invalid_option_waits_before_redraw() {
        let dir = tempfile::tempdir().unwrap();
        let script = "9\n\n1\na\n\nocio\ntrue\n\n0\n";
        let (store, out) = run_script(TaskStore::new(), dir.path().join("t.txt"), script);
        assert!(out.contains("Invalid option."));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_option_and_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let (_, out) = run_script(TaskStore::new(), dir.path().join("t.txt"), "7\n");
        assert!(out.contains("Invalid option."));
    }

    #[test]
    fn test_end_of_input_mid_prompt_exits() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = run_script(TaskStore::new(), dir.path().join("t.txt"), "1\nname\n");
        assert!(store.is_empty());
    }
}
