use std::io;
use std::path::{Path, PathBuf};

use lekha_types::{ImageTask, Selection};

/// Extensions the pipeline accepts, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand a selection into pending tasks, folder traversal non-recursive.
pub fn resolve(selection: &Selection) -> io::Result<Vec<ImageTask>> {
    resolve_with(selection, false)
}

/// Expand a selection into pending tasks.
///
/// Non-image paths are silently dropped in every mode. Explicit file lists
/// keep their given order with duplicates removed (first occurrence wins);
/// folder scans are lexicographic by filename. Zero tasks is a valid
/// result, the caller reports it as "nothing to process".
pub fn resolve_with(selection: &Selection, recurse: bool) -> io::Result<Vec<ImageTask>> {
    let paths = match selection {
        Selection::Single(path) => {
            if is_supported_image(path) {
                vec![path.clone()]
            } else {
                Vec::new()
            }
        }
        Selection::Files(files) => {
            let mut paths: Vec<PathBuf> = Vec::new();
            for path in files {
                if is_supported_image(path) && !paths.contains(path) {
                    paths.push(path.clone());
                }
            }
            paths
        }
        Selection::Folder(dir) => scan_folder(dir, recurse)?,
    };

    tracing::debug!("selection resolved to {} task(s)", paths.len());
    Ok(paths.into_iter().map(ImageTask::new).collect())
}

/// Depth-first folder scan, entries sorted by filename at every level.
fn scan_folder(dir: &Path, recurse: bool) -> io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort_by_key(|path| path.file_name().map(|n| n.to_os_string()));

    let mut paths = Vec::new();
    for entry in entries {
        if entry.is_dir() {
            if recurse {
                paths.extend(scan_folder(&entry, true)?);
            }
        } else if is_supported_image(&entry) {
            paths.push(entry);
        }
    }
    Ok(paths)
}
