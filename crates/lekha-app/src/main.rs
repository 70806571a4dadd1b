use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lekha_types::AppEvent;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod cli;
mod controller;
mod events;
mod profile;
mod state;
mod ui;


use self::cli::{Cli, CombineArgs, Command, RunArgs};
use self::controller::AppController;
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Probe) => probe().await,
        Some(Command::Combine(args)) => combine(args),
        None => run(cli.run).await,
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = profile::load_settings();
    args.apply(&mut config);
    if args.save_settings {
        profile::save_settings(&config)?;
    }

    let Some(selection) = args.selection() else {
        anyhow::bail!("nothing selected: pass image files, or --folder <dir>");
    };

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state.clone());
    let ui_to_app_tx = controller.ui_sender();
    let mut tasks = controller.spawn_tasks();

    ui_to_app_tx.send(AppEvent::StartBatch(selection)).await?;

    let mut cancel_requested = false;
    loop {
        tokio::select! {
            _ = signal::ctrl_c(), if !cancel_requested => {
                tracing::info!("interrupt received, finishing the current image");
                let _ = ui_to_app_tx.send(AppEvent::CancelBatch).await;
                cancel_requested = true;
            }
            result = tasks.join_next() => {
                // The presentation loop returns once the final report is
                // rendered; everything else winds down with it.
                match result {
                    Some(Ok(Ok(()))) => {}
                    Some(Ok(Err(e))) => tracing::error!("task exited: {e}"),
                    Some(Err(e)) => tracing::error!("task panicked: {e}"),
                    None => {}
                }
                controller.shutdown();
                break;
            }
        }
    }

    Ok(())
}

async fn probe() -> anyhow::Result<()> {
    let config = profile::load_settings();
    let timeout = Duration::from_secs(config.timeout_seconds);

    let engine = lekha_ocr::discover_engine(config.engine.path.as_deref(), timeout).await?;
    println!("engine:  {}", engine.command().display());
    println!("version: {}", engine.version().await?);

    let languages = engine.list_languages().await?;
    println!("installed language packs: {}", languages.join(", "));
    for required in ["ben", "eng"] {
        if !languages.iter().any(|l| l == required) {
            println!("missing language pack: {required}");
        }
    }

    Ok(())
}

fn combine(args: CombineArgs) -> anyhow::Result<()> {
    use lekha_core::combine::{CombineOptions, combine_files, scan_text_files, unescape_separator};

    let files = scan_text_files(&args.folder, args.recursive)?;
    if files.is_empty() {
        println!("No .txt files found in {}", args.folder.display());
        return Ok(());
    }

    let options = CombineOptions {
        add_headers: args.headers,
        separator: unescape_separator(&args.separator),
    };
    let summary = combine_files(&files, &args.output, &options)?;

    println!(
        "Combined {} file(s) into {} ({} bytes)",
        summary.files_written,
        args.output.display(),
        summary.bytes_written
    );
    for skipped in &summary.skipped {
        println!("  skipped unreadable file: {}", skipped.display());
    }

    Ok(())
}
