use kanal::AsyncReceiver;
use lekha_types::{AppEvent, BatchReport, ProgressEvent, TaskStatus};

/// Console presentation loop: drains app events on its own schedule and
/// renders them for the operator. Returns after the run's final report so
/// one-shot invocations terminate.
pub async fn ui_loop(app_to_ui_rx: AsyncReceiver<AppEvent>) -> anyhow::Result<()> {
    while let Ok(event) = app_to_ui_rx.recv().await {
        match event {
            AppEvent::BatchStarted { total } => {
                println!("Processing {total} image(s)...");
            }
            AppEvent::NothingToProcess => {
                println!("Nothing to process: the selection contains no supported images.");
            }
            AppEvent::Progress(event) => print_task_line(&event),
            AppEvent::RunRejected { reason } => {
                eprintln!("Run not started: {reason}");
            }
            AppEvent::BatchFinished(report) => {
                print_summary(&report);
                break;
            }
            // UI -> app requests never arrive here.
            AppEvent::StartBatch(_) | AppEvent::CancelBatch => {}
        }
    }
    Ok(())
}

fn print_task_line(event: &ProgressEvent) {
    let done = event.counters.completed();
    let total = event.counters.total;
    let name = event.task.display_name();

    match event.task.status {
        TaskStatus::Succeeded => {
            let output = event
                .task
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("[{done}/{total}] ok      {name} -> {output}");
        }
        TaskStatus::Failed => {
            let error = event.task.error.as_deref().unwrap_or("unknown error");
            println!("[{done}/{total}] FAILED  {name}: {error}");
        }
        TaskStatus::Skipped => {
            println!("[{done}/{total}] skipped {name}");
        }
        TaskStatus::Pending | TaskStatus::Running => {}
    }
}

fn print_summary(report: &BatchReport) {
    // Zero-task runs were already announced as "nothing to process".
    if report.counters.total == 0 {
        return;
    }

    let c = &report.counters;
    println!(
        "Done: {} succeeded, {} failed, {} skipped of {}.",
        c.succeeded, c.failed, c.skipped, c.total
    );
    // Failures are listed individually so the operator can see which
    // inputs need attention.
    for task in report.failures() {
        println!(
            "  failed: {}: {}",
            task.display_name(),
            task.error.as_deref().unwrap_or("unknown error")
        );
    }
}
