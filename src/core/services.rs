//! Contracts for the external collaborators the pipeline drives.
//!
//! All of them may block; the pipeline calls the slow ones from tokio's
//! blocking pool so the interactive context never waits on them.

use crate::core::types::{ExportRequest, ImageHandle, MergeRequest};
use crate::utils::EngineError;

/// Options passed to the open/save file dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDialogOptions {
    pub title: String,
    /// Extensions without leading dot, e.g. `png`
    pub filters: Vec<String>,
    pub allow_multiple: bool,
    pub suggested_file_name: Option<String>,
    pub initial_directory: Option<String>,
}

pub trait FileDialog: Send + Sync {
    /// `None` when the user cancelled.
    fn open_files(&self, options: &FileDialogOptions) -> Option<Vec<String>>;

    /// `None` when the user cancelled.
    fn save_file(&self, options: &FileDialogOptions) -> Option<String>;
}

pub trait ThumbnailService: Send + Sync {
    /// A missing thumbnail is a normal outcome, not an error.
    fn generate_thumbnail(&self, path: &str, max_width: u32, max_height: u32) -> Option<ImageHandle>;
}

pub trait MergeEngine: Send + Sync {
    /// Returns the merged image as encoded bytes.
    fn merge(&self, request: &MergeRequest) -> Result<Vec<u8>, EngineError>;
}

pub trait Exporter: Send + Sync {
    /// Encodes and writes `request.image` to `request.destination`.
    fn export(&self, request: &ExportRequest) -> Result<(), EngineError>;
}
