//! Preview stage: choosing an export format and saving the merge result.

use tracing::debug;

use crate::commands::ComposeSession;
use crate::core::services::FileDialogOptions;
use crate::core::{AppState, ImageHandle};
use crate::processing::ExportOutcome;
use crate::utils::{ExportFormat, MergeImagesResult};

pub struct PreviewSession {
    state: AppState,
    merged: ImageHandle,
    format: ExportFormat,
    quality: Option<u32>,
}

impl PreviewSession {
    pub fn new(state: AppState, merged: ImageHandle) -> Self {
        Self {
            state,
            merged,
            format: ExportFormat::default(),
            quality: None,
        }
    }

    pub fn merged_image(&self) -> &ImageHandle {
        &self.merged
    }

    pub fn selected_format(&self) -> ExportFormat {
        self.format
    }

    pub fn update_format(&mut self, format: ExportFormat) {
        self.format = format;
    }

    /// Quality for lossy exports. Checked against `[0, 100]` when exporting.
    pub fn update_quality(&mut self, quality: u32) {
        self.quality = Some(quality);
    }

    /// Quality that accompanies an export in the selected format.
    pub fn effective_quality(&self) -> Option<u32> {
        if self.format.is_lossy() {
            self.quality.or(self.format.default_quality())
        } else {
            None
        }
    }

    /// Shows the save dialog for the selected format.
    ///
    /// `None` when the user cancelled or picked a blank path.
    pub fn choose_destination(&self) -> Option<String> {
        let options = FileDialogOptions {
            title: "Save Merged Image".to_string(),
            filters: vec![self.format.primary_extension().to_string()],
            suggested_file_name: Some(self.state.config().suggested_export_name.clone()),
            ..FileDialogOptions::default()
        };

        self.state
            .dialogs()
            .save_file(&options)
            .filter(|path| !path.trim().is_empty())
    }

    /// Exports the merge result to `destination` in the selected format.
    pub async fn export_to(&self, destination: &str) -> MergeImagesResult<ExportOutcome> {
        self.state
            .create_export_controller()
            .export(self.merged.clone(), self.format, self.effective_quality(), destination)
            .await
    }

    /// Asks for a destination and exports there.
    ///
    /// `Ok(None)` means the save dialog was cancelled and nothing was written.
    pub async fn save_as(&self) -> MergeImagesResult<Option<ExportOutcome>> {
        let Some(destination) = self.choose_destination() else {
            debug!("Save cancelled");
            return Ok(None);
        };
        self.export_to(&destination).await.map(Some)
    }

    /// Leaves the preview. Composing starts again from an empty collection.
    pub fn go_back(self) -> ComposeSession {
        self.state.new_compose_session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fakes::{FakeDialogs, FakeThumbnails, app_state_with_exporter};
    use crate::processing::fakes::{FakeEngine, FakeExporter};
    use crate::utils::{MergeImagesError, ValidationError};
    use std::sync::Arc;

    fn preview(dialogs: FakeDialogs, exporter: Arc<FakeExporter>) -> PreviewSession {
        let state = app_state_with_exporter(
            Arc::new(dialogs),
            Arc::new(FakeThumbnails),
            Arc::new(FakeEngine::returning(Vec::new())),
            exporter,
        );
        state.open_preview(ImageHandle::placeholder())
    }

    #[tokio::test]
    async fn save_as_exports_lossy_format_with_quality() {
        let exporter = Arc::new(FakeExporter::default());
        let mut session = preview(FakeDialogs::saving("out.jpg"), exporter.clone());
        session.update_format(ExportFormat::JPEG);
        session.update_quality(70);

        let outcome = session.save_as().await.expect("valid").expect("not cancelled");

        assert!(outcome.success);
        let requests = exporter.requests.lock().expect("requests lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].format, ExportFormat::JPEG);
        assert_eq!(requests[0].quality, Some(70));
        assert_eq!(requests[0].image, *session.merged_image());
    }

    #[tokio::test]
    async fn lossy_format_falls_back_to_default_quality() {
        let exporter = Arc::new(FakeExporter::default());
        let mut session = preview(FakeDialogs::saving("out.webp"), exporter.clone());
        session.update_format(ExportFormat::WebP);

        session.save_as().await.expect("valid");

        assert_eq!(exporter.requests.lock().expect("requests lock")[0].quality, Some(80));
    }

    #[tokio::test]
    async fn save_as_exports_lossless_format_without_quality() {
        let exporter = Arc::new(FakeExporter::default());
        let dialogs = FakeDialogs::saving("out.png");
        let session = preview(dialogs, exporter.clone());

        session.save_as().await.expect("valid").expect("not cancelled");

        let requests = exporter.requests.lock().expect("requests lock");
        assert_eq!(requests[0].format, ExportFormat::PNG);
        assert_eq!(requests[0].quality, None);
    }

    #[tokio::test]
    async fn save_dialog_is_offered_the_selected_format() {
        let dialogs = Arc::new(FakeDialogs::saving("out.tiff"));
        let state = app_state_with_exporter(
            dialogs.clone(),
            Arc::new(FakeThumbnails),
            Arc::new(FakeEngine::returning(Vec::new())),
            Arc::new(FakeExporter::default()),
        );
        let mut session = state.open_preview(ImageHandle::placeholder());
        session.update_format(ExportFormat::TIFF);

        assert_eq!(session.choose_destination().as_deref(), Some("out.tiff"));

        let options = dialogs.save_options().expect("dialog shown");
        assert_eq!(options.title, "Save Merged Image");
        assert_eq!(options.filters, vec!["tiff".to_string()]);
        assert_eq!(options.suggested_file_name.as_deref(), Some("merged"));
    }

    #[tokio::test]
    async fn cancelled_or_blank_destination_writes_nothing() {
        for dialogs in [FakeDialogs::cancelled(), FakeDialogs::saving("   ")] {
            let exporter = Arc::new(FakeExporter::default());
            let session = preview(dialogs, exporter.clone());

            assert!(session.save_as().await.expect("no error").is_none());
            assert_eq!(exporter.calls(), 0);
        }
    }

    #[tokio::test]
    async fn out_of_range_quality_is_rejected() {
        let exporter = Arc::new(FakeExporter::default());
        let mut session = preview(FakeDialogs::saving("out.jpg"), exporter.clone());
        session.update_format(ExportFormat::JPEG);
        session.update_quality(150);

        let result = session.save_as().await;

        assert!(matches!(
            result,
            Err(MergeImagesError::Validation(ValidationError::QualityOutOfRange(150)))
        ));
        assert_eq!(exporter.calls(), 0);
    }

    #[tokio::test]
    async fn failed_write_can_be_retried_elsewhere() {
        let exporter = Arc::new(FakeExporter::failing());
        let session = preview(FakeDialogs::cancelled(), exporter.clone());

        let first = session.export_to("/readonly/out.png").await.expect("no error");
        assert!(!first.success);
        assert!(first.error.is_some());

        let second = session.export_to("/tmp/out.png").await.expect("no error");
        assert!(!second.success);
        assert_eq!(exporter.calls(), 2);
    }

    #[tokio::test]
    async fn go_back_starts_an_empty_collection() {
        let session = preview(FakeDialogs::cancelled(), Arc::new(FakeExporter::default()));

        let compose = session.go_back();

        assert!(compose.is_empty());
        assert!(!compose.can_merge());
    }
}
