use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Language packs the engine is asked to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    Bengali,
    English,
}

impl Language {
    /// Tesseract traineddata identifier for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Bengali => "ben",
            Language::English => "eng",
        }
    }
}

/// Which language packs a run recognizes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSelection {
    pub bengali: bool,
    pub english: bool,
}

impl LanguageSelection {
    pub fn new(bengali: bool, english: bool) -> Self {
        Self { bengali, english }
    }

    pub fn is_empty(&self) -> bool {
        !self.bengali && !self.english
    }

    /// Combined engine code ("ben", "eng" or "ben+eng"), None when nothing
    /// is selected.
    pub fn engine_code(&self) -> Option<String> {
        let codes: Vec<&str> = self
            .languages()
            .iter()
            .map(|language| language.code())
            .collect();
        if codes.is_empty() {
            None
        } else {
            Some(codes.join("+"))
        }
    }

    pub fn languages(&self) -> Vec<Language> {
        let mut languages = Vec::new();
        if self.bengali {
            languages.push(Language::Bengali);
        }
        if self.english {
            languages.push(Language::English);
        }
        languages
    }
}

impl Default for LanguageSelection {
    fn default() -> Self {
        Self {
            bengali: true,
            english: true,
        }
    }
}

/// Lifecycle of a single image within a run.
///
/// Pending -> Running -> Succeeded | Failed, or Pending -> Skipped when the
/// run is cancelled before the task starts. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Skipped
        )
    }
}

/// One image queued for recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTask {
    pub path: PathBuf,
    pub status: TaskStatus,
    pub error: Option<String>,
    pub output: Option<PathBuf>,
}

impl ImageTask {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            status: TaskStatus::Pending,
            error: None,
            output: None,
        }
    }

    pub fn mark_running(&mut self) {
        debug_assert_eq!(self.status, TaskStatus::Pending);
        self.status = TaskStatus::Running;
    }

    pub fn mark_succeeded(&mut self, output: PathBuf) {
        debug_assert_eq!(self.status, TaskStatus::Running);
        self.status = TaskStatus::Succeeded;
        self.output = Some(output);
    }

    pub fn mark_failed(&mut self, error: String) {
        debug_assert_eq!(self.status, TaskStatus::Running);
        self.status = TaskStatus::Failed;
        self.error = Some(error);
    }

    pub fn mark_skipped(&mut self) {
        debug_assert_eq!(self.status, TaskStatus::Pending);
        self.status = TaskStatus::Skipped;
    }

    /// File name shown to the operator in progress lines.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// What the user picked in the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Single(PathBuf),
    Files(Vec<PathBuf>),
    Folder(PathBuf),
}

/// Aggregate counters for a run. `total` is fixed when the run is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCounters {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
}

impl BatchCounters {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn completed(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

/// Immutable snapshot emitted after each task reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub index: usize,
    pub task: ImageTask,
    pub counters: BatchCounters,
}

/// Final summary of a run, handed to the presentation layer once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub counters: BatchCounters,
    pub tasks: Vec<ImageTask>,
}

impl BatchReport {
    pub fn empty() -> Self {
        Self {
            counters: BatchCounters::default(),
            tasks: Vec::new(),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ImageTask> {
        self.tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Failed)
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// UI -> app: expand a selection and start a run.
    StartBatch(Selection),
    /// UI -> app: cancel the active run at the next task boundary.
    CancelBatch,
    /// App -> UI: a run was accepted and resolved to `total` tasks.
    BatchStarted { total: usize },
    /// App -> UI: the selection resolved to zero tasks.
    NothingToProcess,
    /// App -> UI: one task reached a terminal state.
    Progress(ProgressEvent),
    /// App -> UI: the run finished or was cancelled.
    BatchFinished(BatchReport),
    /// App -> UI: a run could not start (configuration problem, or another
    /// run is still active).
    RunRejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_code_combines_selected_languages() {
        assert_eq!(
            LanguageSelection::new(true, true).engine_code().as_deref(),
            Some("ben+eng")
        );
        assert_eq!(
            LanguageSelection::new(true, false).engine_code().as_deref(),
            Some("ben")
        );
        assert_eq!(
            LanguageSelection::new(false, true).engine_code().as_deref(),
            Some("eng")
        );
        assert_eq!(LanguageSelection::new(false, false).engine_code(), None);
    }

    #[test]
    fn task_walks_legal_transitions() {
        let mut task = ImageTask::new(PathBuf::from("page.png"));
        assert_eq!(task.status, TaskStatus::Pending);

        task.mark_running();
        assert_eq!(task.status, TaskStatus::Running);
        assert!(!task.status.is_terminal());

        task.mark_succeeded(PathBuf::from("page.txt"));
        assert_eq!(task.status, TaskStatus::Succeeded);
        assert!(task.status.is_terminal());
        assert_eq!(task.output.as_deref(), Some(std::path::Path::new("page.txt")));
    }

    #[test]
    fn skipped_is_terminal_without_running() {
        let mut task = ImageTask::new(PathBuf::from("page.png"));
        task.mark_skipped();
        assert_eq!(task.status, TaskStatus::Skipped);
        assert!(task.status.is_terminal());
        assert!(task.error.is_none());
        assert!(task.output.is_none());
    }

    #[test]
    fn counters_track_completion() {
        let mut counters = BatchCounters::new(3);
        assert_eq!(counters.completed(), 0);
        counters.succeeded += 1;
        counters.failed += 1;
        counters.skipped += 1;
        assert_eq!(counters.completed(), counters.total);
    }
}
