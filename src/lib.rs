// Module declarations in dependency order
pub mod commands;
pub mod core;
pub mod processing;
pub mod utils;

// Public exports for external consumers
pub use crate::commands::{ComposeSession, PreviewSession};
pub use crate::core::services::{
    Exporter, FileDialog, FileDialogOptions, MergeEngine, ThumbnailService,
};
pub use crate::core::{
    AppState, Background, ExportRequest, ImageCollection, ImageHandle, ImageId, ImageReference,
    MergeDirection, MergeOptions, MergeRequest, MergeSource, ReorderGesture, ReorderTarget, Rgba,
    SessionConfig,
};
pub use crate::processing::{ExportController, ExportOutcome, MergeOrchestrator};
pub use crate::utils::{
    EngineError, ExportFormat, MergeImagesError, MergeImagesResult, ValidationError, init_logging,
};
