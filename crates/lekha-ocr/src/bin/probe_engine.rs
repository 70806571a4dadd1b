//! Engine diagnostic - run with: cargo run -p lekha-ocr --bin probe_engine

use std::time::Duration;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // 1. Discover the engine (TESSERACT_CMD env var, then PATH)
    let engine = lekha_ocr::discover_engine(None, Duration::from_secs(10)).await?;
    println!("engine: {}", engine.command().display());

    // 2. Version banner
    println!("version: {}", engine.version().await?);

    // 3. Installed language packs, flag the ones this tool needs
    let languages = engine.list_languages().await?;
    for lang in &languages {
        println!("  lang: {lang}");
    }
    for required in ["ben", "eng"] {
        if !languages.iter().any(|l| l == required) {
            println!("missing language pack: {required}");
        }
    }

    Ok(())
}
