use std::env;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

use crate::error::OcrError;
use crate::TextRecognizer;

/// External Tesseract binary invoked once per image.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(command: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Trivial liveness probe: `tesseract --version`, first line of output.
    pub async fn version(&self) -> Result<String, OcrError> {
        let output = self.run(&["--version".as_ref()]).await?;
        if !output.status.success() {
            return Err(OcrError::EngineFailed(stderr_of(&output)));
        }
        // Tesseract historically printed the version banner on stderr.
        let banner = String::from_utf8_lossy(&output.stdout).to_string()
            + &String::from_utf8_lossy(&output.stderr);
        banner
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .ok_or_else(|| OcrError::EngineFailed("empty version output".to_string()))
    }

    /// Installed traineddata identifiers, e.g. ["ben", "eng", "osd"].
    pub async fn list_languages(&self) -> Result<Vec<String>, OcrError> {
        let output = self.run(&["--list-langs".as_ref()]).await?;
        if !output.status.success() {
            return Err(OcrError::EngineFailed(stderr_of(&output)));
        }
        let listing = String::from_utf8_lossy(&output.stdout).to_string()
            + &String::from_utf8_lossy(&output.stderr);
        Ok(listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .skip(1) // "List of available languages (N):" header
            .map(str::to_string)
            .collect())
    }

    async fn run(&self, args: &[&std::ffi::OsStr]) -> Result<Output, OcrError> {
        let invocation = async {
            Command::new(&self.command)
                .args(args)
                .kill_on_drop(true)
                .output()
                .await
        };

        let result = tokio::time::timeout(self.timeout, invocation)
            .await
            .map_err(|_| OcrError::Timeout(self.timeout))?;

        result.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OcrError::EngineNotFound(self.command.clone())
            } else {
                OcrError::Io(e)
            }
        })
    }
}

#[async_trait::async_trait]
impl TextRecognizer for TesseractEngine {
    async fn recognize(&self, image: &Path, language_code: &str) -> Result<String, OcrError> {
        tracing::debug!("recognizing {} with '{}'", image.display(), language_code);

        let output = self
            .run(&[
                image.as_os_str(),
                "stdout".as_ref(),
                "-l".as_ref(),
                language_code.as_ref(),
            ])
            .await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(classify_failure(
                image,
                language_code,
                &stderr_of(&output),
            ))
        }
    }
}

/// Map a non-zero engine exit onto the error taxonomy by inspecting stderr.
fn classify_failure(image: &Path, language_code: &str, stderr: &str) -> OcrError {
    if stderr.contains("Failed loading language")
        || stderr.contains("Could not initialize tesseract")
    {
        OcrError::MissingLanguage(language_code.to_string())
    } else if stderr.contains("Error in pixRead")
        || stderr.contains("Image file")
        || stderr.contains("Failed loading image")
    {
        OcrError::UnreadableImage {
            path: image.to_path_buf(),
            detail: first_line(stderr),
        }
    } else {
        OcrError::EngineFailed(first_line(stderr))
    }
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("unknown engine error")
        .to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Locate a working engine: configured path first, then the TESSERACT_CMD
/// environment variable, then `tesseract` on PATH. Each candidate is probed
/// with a version check; the first working one wins.
pub async fn discover_engine(
    configured: Option<&Path>,
    timeout: Duration,
) -> Result<TesseractEngine, OcrError> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = configured {
        candidates.push(path.to_path_buf());
    }
    if let Ok(path) = env::var("TESSERACT_CMD") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("tesseract"));

    let mut last_missing = PathBuf::from("tesseract");
    for candidate in candidates {
        let engine = TesseractEngine::new(&candidate, timeout);
        match engine.version().await {
            Ok(version) => {
                tracing::info!("using engine at {}: {}", candidate.display(), version);
                return Ok(engine);
            }
            Err(e) => {
                tracing::warn!("engine candidate {} rejected: {}", candidate.display(), e);
                last_missing = candidate;
            }
        }
    }

    Err(OcrError::EngineNotFound(last_missing))
}
