use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lekha_config::Config;
use lekha_types::Selection;

#[derive(Parser)]
#[command(
    name = "lekha",
    about = "Bengali/English batch OCR front-end for the Tesseract engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Combine the .txt files of a folder into one document
    Combine(CombineArgs),
    /// Check the OCR engine installation and language packs
    Probe,
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Image files to process (jpg, jpeg, png, bmp, tiff, tif)
    pub inputs: Vec<PathBuf>,

    /// Process every supported image in this folder instead
    #[arg(long, conflicts_with = "inputs")]
    pub folder: Option<PathBuf>,

    /// Where the .txt results go (default from settings)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Recognize Bengali only
    #[arg(long, conflicts_with = "english_only")]
    pub bengali_only: bool,

    /// Recognize English only
    #[arg(long)]
    pub english_only: bool,

    /// Engine binary (overrides settings, TESSERACT_CMD and PATH lookup)
    #[arg(long)]
    pub engine: Option<PathBuf>,

    /// Per-image engine timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Recurse into subfolders of --folder
    #[arg(long)]
    pub recursive: bool,

    /// Persist the effective settings for future runs
    #[arg(long)]
    pub save_settings: bool,
}

impl RunArgs {
    /// Fold command-line overrides into the loaded settings.
    pub fn apply(&self, config: &mut Config) {
        if let Some(engine) = &self.engine {
            config.engine.path = Some(engine.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.directory = output_dir.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
        if self.bengali_only {
            config.ocr.bengali = true;
            config.ocr.english = false;
        }
        if self.english_only {
            config.ocr.bengali = false;
            config.ocr.english = true;
        }
        if self.recursive {
            config.ocr.recurse_folders = true;
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        if let Some(folder) = &self.folder {
            Some(Selection::Folder(folder.clone()))
        } else if self.inputs.len() == 1 {
            Some(Selection::Single(self.inputs[0].clone()))
        } else if !self.inputs.is_empty() {
            Some(Selection::Files(self.inputs.clone()))
        } else {
            None
        }
    }
}

#[derive(Args)]
pub struct CombineArgs {
    /// Folder containing the .txt files
    pub folder: PathBuf,

    /// Combined output file
    #[arg(long, default_value = "combined.txt")]
    pub output: PathBuf,

    /// Prefix each file with a "=== name ===" header
    #[arg(long)]
    pub headers: bool,

    /// Separator between files; \n, \r, \t and \\ escapes are honored
    #[arg(long, default_value = r"\n")]
    pub separator: String,

    /// Include .txt files from subfolders
    #[arg(long)]
    pub recursive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_loaded_settings() {
        let mut config = Config::new();
        let args = RunArgs {
            engine: Some(PathBuf::from("/opt/tesseract")),
            english_only: true,
            timeout: Some(5),
            ..Default::default()
        };

        args.apply(&mut config);
        assert_eq!(config.engine.path.as_deref(), Some(std::path::Path::new("/opt/tesseract")));
        assert!(!config.ocr.bengali);
        assert!(config.ocr.english);
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn selection_prefers_folder_then_files() {
        let folder = RunArgs {
            folder: Some(PathBuf::from("scans")),
            ..Default::default()
        };
        assert!(matches!(folder.selection(), Some(Selection::Folder(_))));

        let single = RunArgs {
            inputs: vec![PathBuf::from("a.png")],
            ..Default::default()
        };
        assert!(matches!(single.selection(), Some(Selection::Single(_))));

        let many = RunArgs {
            inputs: vec![PathBuf::from("a.png"), PathBuf::from("b.png")],
            ..Default::default()
        };
        assert!(matches!(many.selection(), Some(Selection::Files(_))));

        assert!(RunArgs::default().selection().is_none());
    }
}
