//! Error types for the merge pipeline.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use serde::Serialize;
use thiserror::Error;

/// Caller input rejected before anything is mutated or dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationError {
    /// A reorder index fell outside `[0, len - 1]`
    #[error("Index out of range: {index} (collection holds {len} images)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Quality for a lossy export outside `[0, 100]`
    #[error("Invalid quality value: {0}. Must be between 0 and 100")]
    QualityOutOfRange(u32),

    /// Export destination was empty or whitespace
    #[error("Export destination must not be empty")]
    EmptyDestination,
}

/// Main error type for the merge pipeline.
///
/// Export failures are deliberately absent: they are reported through
/// [`ExportOutcome`](crate::processing::ExportOutcome) instead.
#[derive(Error, Debug, Serialize)]
pub enum MergeImagesError {
    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The external merge engine rejected or failed the request
    #[error("Merge engine failure: {0}")]
    MergeEngine(String),

    /// The engine output could not be decoded into an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// A blocking worker panicked or was cancelled
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Convenience result type for pipeline operations.
pub type MergeImagesResult<T> = Result<T, MergeImagesError>;

impl MergeImagesError {
    pub fn merge_engine<T: Into<String>>(msg: T) -> Self {
        Self::MergeEngine(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn worker<T: Into<String>>(msg: T) -> Self {
        Self::Worker(msg.into())
    }
}

impl ValidationError {
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

impl From<tokio::task::JoinError> for MergeImagesError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker(format!("Task panicked: {err}"))
    }
}

/// Error reported by an external collaborator (merge engine, exporter).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<io::Error>,
}

impl EngineError {
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self {
            message: format!("IO error: {err}"),
            source: Some(err),
        }
    }
}
