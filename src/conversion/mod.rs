//! WebP to JPEG conversion, independent of the UI.
//!
//! The flow is selection -> conversion -> aggregation -> optional archive
//! export, all driven through one [`BatchState`] owned by the caller.

pub mod archive;
pub mod batch;
pub mod convert;
pub mod error;
pub mod selection;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::{ARCHIVE_NAME, DownloadSink, SaveOutcome, export_archive, save_result};
pub use batch::BatchState;
pub use convert::ConversionResult;
pub use error::ConvertError;
pub use selection::SelectedFile;
pub use worker::{BatchEvent, BatchProgress, BatchWorker};
