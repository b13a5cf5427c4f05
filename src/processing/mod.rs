//! Dispatch of work to the external merge engine and exporter.
//!
//! - [`MergeOrchestrator`]: builds merge requests and decodes engine output
//! - [`ExportController`]: validates and dispatches exports

mod export;
mod merge;

pub use export::{ExportController, ExportOutcome};
pub use merge::MergeOrchestrator;
