use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use lekha_core::{BatchOptions, run_batch};
use lekha_types::{AppEvent, BatchReport, ProgressEvent, Selection};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Accept or reject a run request. On acceptance the run executes on a
/// spawned worker and this returns its cancellation token; every accepted
/// or failed run ends with a `BatchFinished` event so one-shot presentation
/// loops know to stop. A rejection because another run is active sends only
/// `RunRejected` and leaves the active run undisturbed.
pub async fn handle_start_batch(
    state: Arc<AppState>,
    selection: Selection,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<Option<CancellationToken>> {
    if !state.try_begin_run() {
        let _ = app_to_ui_tx
            .send(AppEvent::RunRejected {
                reason: "another run is still active".to_string(),
            })
            .await;
        return Ok(None);
    }

    let (engine_path, languages, output_dir, recurse, timeout) = {
        let config = state.config.read().await;
        (
            config.engine.path.clone(),
            config.ocr.selection(),
            config.output.directory.clone(),
            config.ocr.recurse_folders,
            Duration::from_secs(config.timeout_seconds),
        )
    };

    // Configuration problems are fatal to the run and reported before any
    // task executes.
    if languages.is_empty() {
        return reject(state, app_to_ui_tx, "no recognition language selected".to_string()).await;
    }

    let tasks = match lekha_core::resolve_with(&selection, recurse) {
        Ok(tasks) => tasks,
        Err(e) => {
            return reject(state, app_to_ui_tx, format!("cannot read selection: {e}")).await;
        }
    };

    if tasks.is_empty() {
        state.end_run();
        let _ = app_to_ui_tx.send(AppEvent::NothingToProcess).await;
        let _ = app_to_ui_tx
            .send(AppEvent::BatchFinished(BatchReport::empty()))
            .await;
        return Ok(None);
    }

    let engine = match lekha_ocr::discover_engine(engine_path.as_deref(), timeout).await {
        Ok(engine) => engine,
        Err(e) => {
            return reject(state, app_to_ui_tx, e.to_string()).await;
        }
    };

    let total = tasks.len();
    let _ = app_to_ui_tx.send(AppEvent::BatchStarted { total }).await;

    let options = BatchOptions {
        languages,
        output_dir,
    };
    let run_cancel = CancellationToken::new();
    let worker_cancel = run_cancel.clone();
    let worker_tx = app_to_ui_tx.clone();
    let worker_state = state.clone();

    tokio::spawn(async move {
        let (progress_tx, progress_rx) = kanal::bounded_async::<ProgressEvent>(256);

        // Forward immutable progress snapshots to the presentation side.
        let forward_tx = worker_tx.clone();
        let forwarder = tokio::spawn(async move {
            while let Ok(event) = progress_rx.recv().await {
                let _ = forward_tx.send(AppEvent::Progress(event)).await;
            }
        });

        let result = run_batch(&engine, tasks, &options, &progress_tx, &worker_cancel).await;

        // BatchFinished must trail every progress event.
        drop(progress_tx);
        let _ = forwarder.await;
        worker_state.end_run();

        match result {
            Ok(report) => {
                let _ = worker_tx.send(AppEvent::BatchFinished(report)).await;
            }
            Err(e) => {
                tracing::error!("run aborted: {e}");
                let _ = worker_tx
                    .send(AppEvent::RunRejected {
                        reason: e.to_string(),
                    })
                    .await;
                let _ = worker_tx
                    .send(AppEvent::BatchFinished(BatchReport::empty()))
                    .await;
            }
        }
    });

    Ok(Some(run_cancel))
}

async fn reject(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    reason: String,
) -> anyhow::Result<Option<CancellationToken>> {
    tracing::error!("run rejected: {reason}");
    state.end_run();
    let _ = app_to_ui_tx.send(AppEvent::RunRejected { reason }).await;
    let _ = app_to_ui_tx
        .send(AppEvent::BatchFinished(BatchReport::empty()))
        .await;
    Ok(None)
}
