pub mod types;

pub use types::{
    AppEvent, BatchCounters, BatchReport, ImageTask, Language, LanguageSelection, ProgressEvent,
    Selection, TaskStatus,
};
