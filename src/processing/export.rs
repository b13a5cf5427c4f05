//! Validation and dispatch of export requests.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::services::Exporter;
use crate::core::{ExportRequest, ImageHandle};
use crate::utils::{ExportFormat, MergeImagesResult, validate_destination, validate_export_quality};

/// Result of one export attempt.
///
/// A failed write is an expected outcome, reported here with its cause
/// rather than as an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOutcome {
    pub destination: PathBuf,
    pub format: ExportFormat,
    /// Whether the exporter wrote the file
    pub success: bool,
    /// Cause of the failure when `success` is false
    pub error: Option<String>,
}

impl ExportOutcome {
    fn written(request: &ExportRequest) -> Self {
        Self {
            destination: request.destination.clone(),
            format: request.format,
            success: true,
            error: None,
        }
    }

    fn failed(request: &ExportRequest, error: String) -> Self {
        Self {
            destination: request.destination.clone(),
            format: request.format,
            success: false,
            error: Some(error),
        }
    }
}

/// Stateless front end to an [`Exporter`]. Clones share the exporter.
#[derive(Clone)]
pub struct ExportController {
    exporter: Arc<dyn Exporter>,
}

impl ExportController {
    pub fn new(exporter: Arc<dyn Exporter>) -> Self {
        Self { exporter }
    }

    /// Validates the request, then hands it to the exporter off the caller's
    /// context.
    ///
    /// Only validation problems come back as `Err`; anything the exporter
    /// reports, including a panic, becomes an unsuccessful [`ExportOutcome`].
    pub async fn export(
        &self,
        image: ImageHandle,
        format: ExportFormat,
        quality: Option<u32>,
        destination: &str,
    ) -> MergeImagesResult<ExportOutcome> {
        validate_destination(destination)?;
        let effective_quality = validate_export_quality(format, quality)?;
        if quality.is_some() && effective_quality.is_none() {
            debug!("Ignoring quality for lossless {} export", format);
        }

        let request = ExportRequest {
            image,
            format,
            quality: effective_quality,
            destination: PathBuf::from(destination),
        };
        debug!("Dispatching {} export to {}", format, request.destination.display());

        let exporter = Arc::clone(&self.exporter);
        let dispatched = request.clone();
        let outcome = match tokio::task::spawn_blocking(move || exporter.export(&dispatched)).await {
            Ok(Ok(())) => ExportOutcome::written(&request),
            Ok(Err(e)) => ExportOutcome::failed(&request, e.to_string()),
            Err(e) => ExportOutcome::failed(&request, format!("Exporter panicked: {e}")),
        };

        match &outcome.error {
            None => info!("Exported {} to {}", format, outcome.destination.display()),
            Some(cause) => warn!(
                "Export to {} failed: {}",
                outcome.destination.display(),
                cause
            ),
        }
        Ok(outcome)
    }
}
