use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("engine not found at {0} (install tesseract-ocr or configure the path)")]
    EngineNotFound(PathBuf),

    #[error("language pack '{0}' is not installed")]
    MissingLanguage(String),

    #[error("cannot read image {path}: {detail}")]
    UnreadableImage { path: PathBuf, detail: String },

    #[error("engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("engine failed: {0}")]
    EngineFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
