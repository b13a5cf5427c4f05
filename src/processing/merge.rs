//! Builds merge requests and runs them on the external merge engine.
//!
//! The engine call and the decode of its output both happen inside
//! `tokio::task::spawn_blocking`, so the caller's async context is never
//! blocked for the duration of a merge.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::core::services::MergeEngine;
use crate::core::{ImageHandle, MergeOptions, MergeRequest};
use crate::utils::{MergeImagesError, MergeImagesResult};

/// Stateless front end to a [`MergeEngine`]. Clones share the engine.
#[derive(Clone)]
pub struct MergeOrchestrator {
    engine: Arc<dyn MergeEngine>,
}

impl MergeOrchestrator {
    pub fn new(engine: Arc<dyn MergeEngine>) -> Self {
        Self { engine }
    }

    /// Merges `ordered_paths` top-to-bottom or left-to-right per `options`.
    ///
    /// An empty input short-circuits to [`ImageHandle::placeholder`] without
    /// touching the engine. Engine failures are returned as
    /// [`MergeImagesError::MergeEngine`] and are not retried.
    pub async fn merge<S: AsRef<str>>(
        &self,
        ordered_paths: &[S],
        options: MergeOptions,
    ) -> MergeImagesResult<ImageHandle> {
        if ordered_paths.is_empty() {
            debug!("Merge requested with no images, returning placeholder");
            return Ok(ImageHandle::placeholder());
        }

        let request = MergeRequest::from_ordered_paths(ordered_paths, options);
        let count = request.images.len();
        debug!(
            "Dispatching merge of {} images ({:?}, spacing {})",
            count, options.direction, options.spacing
        );

        let engine = Arc::clone(&self.engine);
        let start = Instant::now();
        let result = tokio::task::spawn_blocking(move || run_merge(engine.as_ref(), &request)).await?;

        match &result {
            Ok(handle) => info!(
                "Merged {} images into {}×{} in {}ms",
                count,
                handle.width(),
                handle.height(),
                start.elapsed().as_millis()
            ),
            Err(e) => warn!("Merge of {} images failed: {}", count, e),
        }
        result
    }
}

// ── Blocking work (runs on tokio's blocking thread pool) ──────────────────────────────

fn run_merge(engine: &dyn MergeEngine, request: &MergeRequest) -> MergeImagesResult<ImageHandle> {
    let bytes = engine
        .merge(request)
        .map_err(|e| MergeImagesError::merge_engine(e.to_string()))?;

    decode_merged(&bytes)
}

fn decode_merged(bytes: &[u8]) -> MergeImagesResult<ImageHandle> {
    image::load_from_memory(bytes)
        .map(ImageHandle::new)
        .map_err(|e| MergeImagesError::decode(format!("Failed to decode merged image: {e}")))
}
