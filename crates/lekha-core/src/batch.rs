use std::path::PathBuf;

use kanal::AsyncSender;
use lekha_ocr::TextRecognizer;
use lekha_types::{BatchCounters, BatchReport, ImageTask, LanguageSelection, ProgressEvent};
use tokio_util::sync::CancellationToken;

/// Per-run knobs the processor needs besides the task list.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub languages: LanguageSelection,
    pub output_dir: PathBuf,
}

/// Configuration problems that stop a run before any task executes.
/// Per-task failures never surface here; they are recorded on the task.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("no recognition language selected")]
    EmptyLanguageSelection,

    #[error("cannot prepare output directory {path}: {source}")]
    OutputDirUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Execute a run to completion or cancellation.
///
/// Tasks run strictly sequentially; the engine call is the only suspension
/// point. One progress event is emitted per task, in task order, for every
/// terminal state including Skipped. A failing task is recorded and the run
/// moves on; cancellation is honored at task boundaries only, so a task
/// already handed to the engine completes first.
pub async fn run_batch(
    engine: &dyn TextRecognizer,
    mut tasks: Vec<ImageTask>,
    options: &BatchOptions,
    progress_tx: &AsyncSender<ProgressEvent>,
    cancel: &CancellationToken,
) -> Result<BatchReport, BatchError> {
    let language_code = options
        .languages
        .engine_code()
        .ok_or(BatchError::EmptyLanguageSelection)?;

    tokio::fs::create_dir_all(&options.output_dir)
        .await
        .map_err(|source| BatchError::OutputDirUnavailable {
            path: options.output_dir.clone(),
            source,
        })?;

    let mut counters = BatchCounters::new(tasks.len());

    for index in 0..tasks.len() {
        if cancel.is_cancelled() {
            tracing::info!("run cancelled, skipping {} task(s)", tasks.len() - index);
            for skipped in index..tasks.len() {
                tasks[skipped].mark_skipped();
                counters.skipped += 1;
                let _ = progress_tx
                    .send(ProgressEvent {
                        index: skipped,
                        task: tasks[skipped].clone(),
                        counters,
                    })
                    .await;
            }
            break;
        }

        let task = &mut tasks[index];
        task.mark_running();
        tracing::debug!("task {}/{}: {}", index + 1, counters.total, task.display_name());

        match engine.recognize(&task.path, &language_code).await {
            Ok(text) => {
                let output = output_path(&options.output_dir, &task.path);
                match tokio::fs::write(&output, text.as_bytes()).await {
                    Ok(()) => {
                        counters.succeeded += 1;
                        task.mark_succeeded(output);
                    }
                    Err(e) => {
                        tracing::warn!("write failed for {}: {}", output.display(), e);
                        counters.failed += 1;
                        task.mark_failed(format!("cannot write {}: {e}", output.display()));
                    }
                }
            }
            Err(e) => {
                tracing::warn!("recognition failed for {}: {}", task.display_name(), e);
                counters.failed += 1;
                task.mark_failed(e.to_string());
            }
        }

        let _ = progress_tx
            .send(ProgressEvent {
                index,
                task: tasks[index].clone(),
                counters,
            })
            .await;
    }

    Ok(BatchReport { counters, tasks })
}

/// `<output_dir>/<input_stem>.txt`. Same-named stems overwrite: last write
/// wins within a run.
fn output_path(output_dir: &std::path::Path, input: &std::path::Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{stem}.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::Mutex;

    use lekha_ocr::OcrError;
    use lekha_types::TaskStatus;

    /// Scripted engine: fails for configured file names, optionally cancels
    /// the run token after its first call.
    struct FakeRecognizer {
        fail_names: Vec<&'static str>,
        cancel_after_first: Option<CancellationToken>,
        calls: Mutex<Vec<(PathBuf, String)>>,
    }

    impl FakeRecognizer {
        fn new() -> Self {
            Self {
                fail_names: Vec::new(),
                cancel_after_first: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(names: Vec<&'static str>) -> Self {
            Self {
                fail_names: names,
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<(PathBuf, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl TextRecognizer for FakeRecognizer {
        async fn recognize(&self, image: &Path, language_code: &str) -> Result<String, OcrError> {
            let first_call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((image.to_path_buf(), language_code.to_string()));
                calls.len() == 1
            };
            if first_call && let Some(token) = &self.cancel_after_first {
                token.cancel();
            }

            let name = image.file_name().unwrap().to_str().unwrap();
            if self.fail_names.contains(&name) {
                Err(OcrError::EngineFailed("simulated engine failure".to_string()))
            } else {
                Ok(format!("text from {name}"))
            }
        }
    }

    fn tasks_named(names: &[&str]) -> Vec<ImageTask> {
        names
            .iter()
            .map(|name| ImageTask::new(PathBuf::from(name)))
            .collect()
    }

    fn options(dir: &Path) -> BatchOptions {
        BatchOptions {
            languages: LanguageSelection::new(true, true),
            output_dir: dir.to_path_buf(),
        }
    }

    async fn drain(
        rx: kanal::AsyncReceiver<ProgressEvent>,
    ) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn writes_one_output_per_task_and_reports_in_order() {
        let out = tempfile::tempdir().unwrap();
        let engine = FakeRecognizer::new();
        let (tx, rx) = kanal::unbounded_async();

        let report = run_batch(
            &engine,
            tasks_named(&["a.png", "b.jpg"]),
            &options(out.path()),
            &tx,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        drop(tx);

        assert_eq!(report.counters.succeeded, 2);
        assert_eq!(report.counters.total, 2);
        assert_eq!(
            std::fs::read_to_string(out.path().join("a.txt")).unwrap(),
            "text from a.png"
        );
        assert_eq!(
            std::fs::read_to_string(out.path().join("b.txt")).unwrap(),
            "text from b.jpg"
        );

        // Combined language code reaches the engine.
        assert!(engine.calls().iter().all(|(_, lang)| lang == "ben+eng"));

        // One event per task, in task order, counters monotonic.
        let events = drain(rx).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].index, 0);
        assert_eq!(events[1].index, 1);
        assert_eq!(events[0].counters.completed(), 1);
        assert_eq!(events[1].counters.completed(), 2);
    }

    #[tokio::test]
    async fn failing_task_does_not_abort_the_run() {
        let out = tempfile::tempdir().unwrap();
        let engine = FakeRecognizer::failing_on(vec!["b.jpg"]);
        let (tx, rx) = kanal::unbounded_async();

        let report = run_batch(
            &engine,
            tasks_named(&["a.png", "b.jpg", "c.tif"]),
            &options(out.path()),
            &tx,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        drop(tx);

        let statuses: Vec<_> = report.tasks.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![TaskStatus::Succeeded, TaskStatus::Failed, TaskStatus::Succeeded]
        );
        assert_eq!(
            report.tasks[1].error.as_deref(),
            Some("engine failed: simulated engine failure")
        );
        assert!(report.tasks[1].output.is_none());

        assert_eq!(report.counters.succeeded, 2);
        assert_eq!(report.counters.failed, 1);
        assert_eq!(report.counters.completed(), report.counters.total);
        assert_eq!(drain(rx).await.len(), 3);
    }

    #[tokio::test]
    async fn empty_language_selection_fails_before_any_task() {
        let out = tempfile::tempdir().unwrap();
        let engine = FakeRecognizer::new();
        let (tx, rx) = kanal::unbounded_async();

        let err = run_batch(
            &engine,
            tasks_named(&["a.png"]),
            &BatchOptions {
                languages: LanguageSelection::new(false, false),
                output_dir: out.path().to_path_buf(),
            },
            &tx,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        drop(tx);

        assert!(matches!(err, BatchError::EmptyLanguageSelection));
        assert!(engine.calls().is_empty());
        assert!(drain(rx).await.is_empty());
    }

    #[tokio::test]
    async fn cancellation_skips_remaining_tasks() {
        let out = tempfile::tempdir().unwrap();
        let cancel = CancellationToken::new();
        let engine = FakeRecognizer {
            cancel_after_first: Some(cancel.clone()),
            ..FakeRecognizer::new()
        };
        let (tx, rx) = kanal::unbounded_async();

        let report = run_batch(
            &engine,
            tasks_named(&["a.png", "b.jpg", "c.tif"]),
            &options(out.path()),
            &tx,
            &cancel,
        )
        .await
        .unwrap();
        drop(tx);

        // Task 1 was mid-flight and completes; the rest never start.
        let statuses: Vec<_> = report.tasks.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![TaskStatus::Succeeded, TaskStatus::Skipped, TaskStatus::Skipped]
        );
        assert_eq!(engine.calls().len(), 1);
        assert_eq!(report.counters.total, 3);
        assert_eq!(report.counters.skipped, 2);
        assert_eq!(report.counters.completed(), 3);

        // Skipped tasks still get their progress event, in order.
        let events = drain(rx).await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].task.status, TaskStatus::Skipped);
        assert_eq!(events[2].task.status, TaskStatus::Skipped);
    }

    #[tokio::test]
    async fn colliding_stems_resolve_to_last_write_wins() {
        let out = tempfile::tempdir().unwrap();
        let engine = FakeRecognizer::new();
        let (tx, _rx) = kanal::unbounded_async();

        let report = run_batch(
            &engine,
            tasks_named(&["a.jpg", "a.png"]),
            &options(out.path()),
            &tx,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.counters.succeeded, 2);
        assert_eq!(
            std::fs::read_to_string(out.path().join("a.txt")).unwrap(),
            "text from a.png"
        );
    }

    #[tokio::test]
    async fn rerun_produces_identical_outputs() {
        let out = tempfile::tempdir().unwrap();
        let (tx, _rx) = kanal::unbounded_async();

        for _ in 0..2 {
            let engine = FakeRecognizer::new();
            run_batch(
                &engine,
                tasks_named(&["a.png"]),
                &options(out.path()),
                &tx,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
            assert_eq!(
                std::fs::read_to_string(out.path().join("a.txt")).unwrap(),
                "text from a.png"
            );
        }
    }

    #[tokio::test]
    async fn empty_task_list_is_a_valid_run() {
        let out = tempfile::tempdir().unwrap();
        let engine = FakeRecognizer::new();
        let (tx, _rx) = kanal::unbounded_async();

        let report = run_batch(
            &engine,
            Vec::new(),
            &options(out.path()),
            &tx,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.counters.total, 0);
        assert!(report.tasks.is_empty());
    }
}
