use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lekha_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod start_batch;

use start_batch::handle_start_batch;

/// App's main loop: consumes presentation-side requests, drives runs.
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    // Cancellation token of the run currently in flight, if any.
    let mut active_run: Option<CancellationToken> = None;

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("event loop stopping");
                return Ok(());
            }
            event = ui_to_app_rx.recv() => event?,
        };

        match event {
            AppEvent::StartBatch(selection) => {
                // A rejected start must not clobber the active run's handle.
                if let Some(token) =
                    handle_start_batch(state.clone(), selection, &app_to_ui_tx).await?
                {
                    active_run = Some(token);
                }
            }
            AppEvent::CancelBatch => {
                if let Some(token) = &active_run {
                    tracing::info!("cancellation requested, current task will finish");
                    token.cancel();
                } else {
                    tracing::debug!("cancel received with no active run");
                }
            }
            // App -> UI traffic never arrives here.
            AppEvent::BatchStarted { .. }
            | AppEvent::NothingToProcess
            | AppEvent::Progress(_)
            | AppEvent::BatchFinished(_)
            | AppEvent::RunRejected { .. } => {}
        }
    }
}
