use lekha_types::LanguageSelection;
use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    #[serde(default = "default_enabled")]
    pub bengali: bool,
    #[serde(default = "default_enabled")]
    pub english: bool,
    /// Walk into subfolders when a folder is selected. Off by default:
    /// folder selections process top-level files only.
    pub recurse_folders: bool,
}

impl OcrConfig {
    pub fn selection(&self) -> LanguageSelection {
        LanguageSelection::new(self.bengali, self.english)
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            bengali: default_enabled(),
            english: default_enabled(),
            recurse_folders: false,
        }
    }
}
