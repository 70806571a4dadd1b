use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the external Tesseract binary lives. `path: None` means "discover
/// it": TESSERACT_CMD env var first, then PATH lookup.
#[derive(Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn new() -> Self {
        let path = env::var("TESSERACT_CMD").ok().map(PathBuf::from);

        Self { path }
    }
}
