mod engine;
mod error;

pub use engine::{TesseractEngine, discover_engine};
pub use error::OcrError;

use std::path::Path;

/// Recognition provider interface. The batch processor only sees this seam,
/// so tests can substitute a scripted engine.
#[async_trait::async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in one image file using the given engine language
    /// code (e.g. "ben", "eng", "ben+eng").
    async fn recognize(&self, image: &Path, language_code: &str) -> Result<String, OcrError>;
}
