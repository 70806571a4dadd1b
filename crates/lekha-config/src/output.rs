use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_directory() -> PathBuf {
    PathBuf::from("ocr_output")
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// One `<stem>.txt` per recognized image lands here. Same-named stems
    /// within a run overwrite each other (last write wins).
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}
