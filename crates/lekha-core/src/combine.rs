//! Auxiliary text-file combiner: concatenates the per-image `.txt` outputs
//! of a run (or any folder of text files) into a single UTF-8 document.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Prefix each file's content with a `=== <name> ===` header line.
    pub add_headers: bool,
    /// Inserted between files; `\n`, `\r`, `\t` and `\\` escapes are
    /// interpreted by [`unescape_separator`].
    pub separator: String,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            add_headers: false,
            separator: "\n".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CombineSummary {
    pub files_written: usize,
    pub bytes_written: usize,
    /// Inputs that disappeared or could not be read; never fatal.
    pub skipped: Vec<PathBuf>,
}

/// Interpret `\n`, `\r`, `\t` and `\\` in a separator typed by the user.
/// Other backslash sequences are kept as-is.
pub fn unescape_separator(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('n') => {
                    out.push('\n');
                    chars.next();
                }
                Some('r') => {
                    out.push('\r');
                    chars.next();
                }
                Some('t') => {
                    out.push('\t');
                    chars.next();
                }
                Some('\\') => {
                    out.push('\\');
                    chars.next();
                }
                _ => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// `.txt` files under `folder` (case-insensitive), sorted by path for a
/// stable combine order. Top level only unless `recursive`.
pub fn scan_text_files(folder: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    if !folder.is_dir() {
        return Ok(results);
    }
    collect_txt(folder, recursive, &mut results)?;
    results.sort_by_key(|path| path.to_string_lossy().to_lowercase());
    Ok(results)
}

fn collect_txt(folder: &Path, recursive: bool, results: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_txt(&path, true, results)?;
            }
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        {
            results.push(path);
        }
    }
    Ok(())
}

/// Concatenate `files` into `output` (always UTF-8, lossy read, line
/// endings normalized to `\n`). Unreadable inputs are skipped and listed
/// in the summary rather than failing the whole combine.
pub fn combine_files(
    files: &[PathBuf],
    output: &Path,
    options: &CombineOptions,
) -> io::Result<CombineSummary> {
    let mut summary = CombineSummary::default();
    let mut combined = String::new();

    for path in files {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                summary.skipped.push(path.clone());
                continue;
            }
        };
        let text = String::from_utf8_lossy(&bytes)
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        if summary.files_written > 0 {
            combined.push_str(&options.separator);
        }
        if options.add_headers {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            combined.push_str(&format!("=== {name} ===\n"));
        }
        combined.push_str(&text);
        summary.files_written += 1;
    }

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, combined.as_bytes())?;
    summary.bytes_written = combined.len();

    Ok(summary)
}
