pub mod batch;
pub mod combine;
pub mod resolver;

pub use batch::{BatchError, BatchOptions, run_batch};
pub use resolver::{SUPPORTED_EXTENSIONS, is_supported_image, resolve, resolve_with};
