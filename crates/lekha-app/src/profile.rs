use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use lekha_config::Config;

/// Settings live next to the binary by default, like the original tool's
/// `ocr_settings.json`; LEKHA_SETTINGS_PATH overrides.
fn settings_path() -> PathBuf {
    env::var("LEKHA_SETTINGS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("ocr_settings.json"))
}

/// Load persisted settings, falling back to defaults when the file is
/// absent, unreadable, or malformed. Malformed settings must never crash
/// the application.
pub fn load_settings() -> Config {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Config {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "malformed settings in {}, using defaults: {}",
                    path.display(),
                    e
                );
                Config::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no settings file at {}, using defaults", path.display());
            Config::new()
        }
        Err(e) => {
            tracing::warn!("cannot read {}, using defaults: {}", path.display(), e);
            Config::new()
        }
    }
}

pub fn save_settings(config: &Config) -> anyhow::Result<()> {
    save_settings_to(&settings_path(), config)
}

pub fn save_settings_to(path: &Path, config: &Config) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    tracing::info!("settings saved to {}", path.display());
    Ok(())
}
