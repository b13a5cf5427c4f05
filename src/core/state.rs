//! Shared application state.

use std::sync::Arc;

use tracing::debug;

use crate::commands::{ComposeSession, PreviewSession};
use crate::core::SessionConfig;
use crate::core::services::{Exporter, FileDialog, MergeEngine, ThumbnailService};
use crate::core::types::ImageHandle;
use crate::processing::{ExportController, MergeOrchestrator};

/// Collaborators and settings shared by every session.
///
/// Cheap to clone; all clones share the same services. Sessions get their
/// own collection, but orchestrators and export controllers created here are
/// stateless and may be shared freely.
#[derive(Clone)]
pub struct AppState {
    dialogs: Arc<dyn FileDialog>,
    thumbnails: Arc<dyn ThumbnailService>,
    engine: Arc<dyn MergeEngine>,
    exporter: Arc<dyn Exporter>,
    config: Arc<SessionConfig>,
}

impl AppState {
    pub fn new(
        dialogs: Arc<dyn FileDialog>,
        thumbnails: Arc<dyn ThumbnailService>,
        engine: Arc<dyn MergeEngine>,
        exporter: Arc<dyn Exporter>,
    ) -> Self {
        Self {
            dialogs,
            thumbnails,
            engine,
            exporter,
            config: Arc::new(SessionConfig::default()),
        }
    }

    pub fn with_config(self, config: SessionConfig) -> Self {
        debug!("Session config: {:?}", config);
        Self {
            config: Arc::new(config),
            ..self
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn dialogs(&self) -> &Arc<dyn FileDialog> {
        &self.dialogs
    }

    pub fn thumbnails(&self) -> &Arc<dyn ThumbnailService> {
        &self.thumbnails
    }

    pub fn create_merge_orchestrator(&self) -> MergeOrchestrator {
        MergeOrchestrator::new(Arc::clone(&self.engine))
    }

    pub fn create_export_controller(&self) -> ExportController {
        ExportController::new(Arc::clone(&self.exporter))
    }

    /// Starts a compose stage with an empty collection.
    pub fn new_compose_session(&self) -> ComposeSession {
        ComposeSession::new(self.clone())
    }

    /// Starts a preview stage for a merge result.
    pub fn open_preview(&self, merged: ImageHandle) -> PreviewSession {
        PreviewSession::new(self.clone(), merged)
    }
}
