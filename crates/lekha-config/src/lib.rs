use std::env;

use serde::{Deserialize, Serialize};

use self::engine::EngineConfig;
use self::ocr::OcrConfig;
use self::output::OutputConfig;

pub mod engine;
pub mod ocr;
pub mod output;

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub ocr: OcrConfig,
    pub output: OutputConfig,

    /// Upper bound for one engine invocation, in seconds.
    pub timeout_seconds: u64,
}

impl Config {
    pub fn new() -> Self {
        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30); // 30 seconds default

        Config {
            engine: EngineConfig::new(),
            ocr: OcrConfig::default(),
            output: OutputConfig::default(),

            timeout_seconds,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_empty_object() {
        // Persisted settings from older versions may miss whole sections.
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.ocr.bengali);
        assert!(config.ocr.english);
        assert!(!config.ocr.recurse_folders);
    }

    #[test]
    fn ignores_unknown_fields() {
        let config: Config =
            serde_json::from_str(r#"{"timeout_seconds": 5, "legacy_field": true}"#).unwrap();
        assert_eq!(config.timeout_seconds, 5);
    }
}
