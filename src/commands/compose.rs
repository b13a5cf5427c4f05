//! Compose stage: building the ordered collection and triggering the merge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::commands::PreviewSession;
use crate::core::services::FileDialogOptions;
use crate::core::{
    AppState, Background, ImageCollection, ImageId, ImageReference, MergeDirection, MergeOptions,
    ReorderGesture, ReorderTarget,
};
use crate::utils::{MergeImagesResult, ValidationError, lock};

/// One editing session over a fresh collection.
///
/// Structural changes are serialized through the collection lock; thumbnail
/// workers take the same lock only to store their result by id.
pub struct ComposeSession {
    state: AppState,
    collection: Arc<Mutex<ImageCollection>>,
    options: Mutex<MergeOptions>,
    thumbnail_tasks: Mutex<Vec<JoinHandle<()>>>,
    merging: AtomicBool,
}

impl ComposeSession {
    pub fn new(state: AppState) -> Self {
        let options = state.config().default_merge_options;
        Self {
            state,
            collection: Arc::new(Mutex::new(ImageCollection::new())),
            options: Mutex::new(options),
            thumbnail_tasks: Mutex::new(Vec::new()),
            merging: AtomicBool::new(false),
        }
    }

    /// Asks the file dialog for images and appends the chosen ones.
    ///
    /// A cancelled dialog or an empty selection leaves the collection as is.
    pub fn select_images(&self) -> Vec<ImageReference> {
        let config = self.state.config();
        let options = FileDialogOptions {
            title: "Select Images".to_string(),
            filters: config.open_filters.clone(),
            allow_multiple: true,
            ..FileDialogOptions::default()
        };

        match self.state.dialogs().open_files(&options) {
            Some(paths) if !paths.is_empty() => self.add_images(paths),
            _ => {
                debug!("Image selection cancelled or empty");
                Vec::new()
            }
        }
    }

    /// Files dropped from outside the application. Blank entries are skipped.
    pub fn drop_files<I, S>(&self, paths: I) -> Vec<ImageReference>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<String> = paths
            .into_iter()
            .map(Into::into)
            .filter(|path| !path.trim().is_empty())
            .collect();

        if paths.is_empty() {
            return Vec::new();
        }
        self.add_images(paths)
    }

    /// Appends `paths` in order and requests a thumbnail for each one.
    pub fn add_images<I, S>(&self, paths: I) -> Vec<ImageReference>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added = lock(&self.collection).add(paths);
        self.request_thumbnails(&added);
        added
    }

    pub fn remove_image(&self, id: ImageId) -> bool {
        lock(&self.collection).remove(id)
    }

    pub fn clear_all_images(&self) {
        lock(&self.collection).clear();
        debug!("Collection cleared");
    }

    pub fn reorder_images(&self, from: usize, to: usize) -> Result<(), ValidationError> {
        lock(&self.collection).reorder(from, to)
    }

    /// Gesture controller sized to this session's handle region.
    pub fn reorder_gesture(&self) -> ReorderGesture {
        ReorderGesture::new(self.state.config().handle_region_width)
    }

    /// Point-in-time copy of the collection in order.
    pub fn images(&self) -> Vec<ImageReference> {
        lock(&self.collection).snapshot()
    }

    pub fn len(&self) -> usize {
        lock(&self.collection).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.collection).is_empty()
    }

    /// True with two or more images and no merge already outstanding.
    pub fn can_merge(&self) -> bool {
        !self.merging.load(Ordering::Acquire) && lock(&self.collection).can_merge()
    }

    pub fn options(&self) -> MergeOptions {
        *lock(&self.options)
    }

    pub fn update_merge_options(&self, options: MergeOptions) {
        *lock(&self.options) = options;
    }

    pub fn set_direction(&self, direction: MergeDirection) {
        let mut options = lock(&self.options);
        *options = options.with_direction(direction);
    }

    pub fn set_spacing(&self, spacing: u32) {
        let mut options = lock(&self.options);
        *options = options.with_spacing(spacing);
    }

    pub fn set_background(&self, background: Background) {
        let mut options = lock(&self.options);
        *options = options.with_background(background);
    }

    /// Merges the current collection and opens the preview stage.
    ///
    /// Returns `Ok(None)` without dispatching when fewer than two images are
    /// present or a merge is already in flight.
    pub async fn merge(&self) -> MergeImagesResult<Option<PreviewSession>> {
        if !lock(&self.collection).can_merge() {
            debug!("Merge skipped, fewer than two images");
            return Ok(None);
        }
        if self.merging.swap(true, Ordering::AcqRel) {
            debug!("Merge skipped, previous merge still running");
            return Ok(None);
        }
        let _in_flight = InFlight(&self.merging);

        let paths = lock(&self.collection).ordered_paths();
        let options = self.options();
        let merged = self
            .state
            .create_merge_orchestrator()
            .merge(paths.as_slice(), options)
            .await?;

        Ok(Some(self.state.open_preview(merged)))
    }

    /// Waits for every thumbnail requested so far.
    pub async fn settle_thumbnails(&self) {
        let pending: Vec<_> = lock(&self.thumbnail_tasks).drain(..).collect();
        for task in pending {
            if let Err(e) = task.await {
                warn!("Thumbnail worker failed: {}", e);
            }
        }
    }

    fn request_thumbnails(&self, added: &[ImageReference]) {
        if added.is_empty() {
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime, skipping {} thumbnails", added.len());
            return;
        };

        let config = self.state.config();
        let (max_width, max_height) = (config.thumbnail_max_width, config.thumbnail_max_height);
        let mut tasks = lock(&self.thumbnail_tasks);
        tasks.retain(|task| !task.is_finished());

        for reference in added {
            let service = Arc::clone(self.state.thumbnails());
            let collection = Arc::clone(&self.collection);
            let id = reference.id;
            let path = reference.source_path.clone();

            tasks.push(runtime.spawn_blocking(move || {
                let Some(thumbnail) = service.generate_thumbnail(&path, max_width, max_height) else {
                    debug!("No thumbnail for {}", path);
                    return;
                };
                if !lock(&collection).apply_thumbnail(id, thumbnail) {
                    debug!("Discarding thumbnail for removed image {}", path);
                }
            }));
        }
    }
}

impl ReorderTarget for ComposeSession {
    fn reorder(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        self.reorder_images(from, to)
    }
}

/// Clears the merge-in-flight flag when the merge finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fakes::{FakeDialogs, FakeThumbnails, GatedThumbnails, app_state};
    use crate::core::Rgba;
    use crate::processing::fakes::{FakeEngine, png_bytes};
    use crate::utils::MergeImagesError;

    fn paths(session: &ComposeSession) -> Vec<String> {
        session.images().into_iter().map(|image| image.source_path).collect()
    }

    #[tokio::test]
    async fn select_images_appends_in_dialog_order() {
        let dialogs = Arc::new(FakeDialogs::opening(&["a.png", "b.jpg", "c.webp"]));
        let state = app_state(dialogs.clone(), Arc::new(FakeThumbnails), Arc::new(FakeEngine::returning(png_bytes(2, 2))));
        let session = state.new_compose_session();

        let added = session.select_images();

        assert_eq!(added.len(), 3);
        assert!(session.can_merge());
        assert_eq!(paths(&session), vec!["a.png", "b.jpg", "c.webp"]);
        let options = dialogs.open_options().expect("dialog shown");
        assert_eq!(options.title, "Select Images");
        assert!(options.allow_multiple);
        assert_eq!(options.filters.len(), 6);
    }

    #[tokio::test]
    async fn cancelled_or_empty_selection_is_a_no_op() {
        for dialogs in [FakeDialogs::cancelled(), FakeDialogs::opening(&[])] {
            let state = app_state(Arc::new(dialogs), Arc::new(FakeThumbnails), Arc::new(FakeEngine::returning(Vec::new())));
            let session = state.new_compose_session();

            assert!(session.select_images().is_empty());
            assert!(session.is_empty());
        }
    }

    #[tokio::test]
    async fn thumbnails_arrive_after_add() {
        let state = app_state(Arc::new(FakeDialogs::cancelled()), Arc::new(FakeThumbnails), Arc::new(FakeEngine::returning(Vec::new())));
        let session = state.new_compose_session();

        let added = session.add_images(["a.png", "broken.png", "c.png"]);
        assert!(added.iter().all(|image| image.thumbnail.is_none()));
        session.settle_thumbnails().await;

        let with_thumbs: Vec<_> = session
            .images()
            .into_iter()
            .map(|image| image.thumbnail.is_some())
            .collect();
        assert_eq!(with_thumbs, vec![true, false, true]);
    }

    #[tokio::test]
    async fn late_thumbnails_follow_ids_not_positions() {
        let (thumbnails, gate) = GatedThumbnails::new();
        let state = app_state(Arc::new(FakeDialogs::cancelled()), Arc::new(thumbnails), Arc::new(FakeEngine::returning(Vec::new())));
        let session = state.new_compose_session();

        let added = session.add_images(["a.png", "b.png", "c.png"]);
        assert!(session.remove_image(added[0].id));
        session.reorder_images(1, 0).expect("in range");
        for _ in 0..added.len() {
            gate.send(()).expect("gate open");
        }
        session.settle_thumbnails().await;

        let images = session.images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, added[2].id);
        assert_eq!(images[0].order, 0);
        assert!(images.iter().all(|image| image.thumbnail.is_some()));
    }

    #[tokio::test]
    async fn dropped_files_skip_blank_paths() {
        let state = app_state(Arc::new(FakeDialogs::cancelled()), Arc::new(FakeThumbnails), Arc::new(FakeEngine::returning(Vec::new())));
        let session = state.new_compose_session();

        let added = session.drop_files(["x.png", "  ", "", "y.png"]);
        assert_eq!(added.len(), 2);
        assert!(session.drop_files(Vec::<String>::new()).is_empty());
        assert_eq!(paths(&session), vec!["x.png", "y.png"]);
    }

    #[tokio::test]
    async fn merge_sends_ordered_paths_and_options() {
        let engine = Arc::new(FakeEngine::returning(png_bytes(3, 7)));
        let state = app_state(Arc::new(FakeDialogs::cancelled()), Arc::new(FakeThumbnails), engine.clone());
        let session = state.new_compose_session();
        session.add_images(["1.png", "2.png", "3.png"]);
        session.reorder_images(2, 0).expect("in range");
        session.set_spacing(12);
        session.set_background(Background::Solid(Rgba::BLACK));

        let preview = session.merge().await.expect("merge succeeds").expect("preview opened");

        assert_eq!(preview.merged_image().width(), 3);
        let requests = engine.requests.lock().expect("requests lock");
        assert_eq!(requests.len(), 1);
        let sent: Vec<_> = requests[0].images.iter().map(|source| (source.path.as_str(), source.order)).collect();
        assert_eq!(sent, vec![("3.png", 0), ("1.png", 1), ("2.png", 2)]);
        assert_eq!(requests[0].options.spacing, 12);
        assert_eq!(requests[0].options.background, Background::Solid(Rgba::BLACK));
        assert!(session.can_merge(), "flag is cleared once the merge resolves");
    }

    #[tokio::test]
    async fn merge_needs_two_images() {
        let engine = Arc::new(FakeEngine::returning(png_bytes(1, 1)));
        let state = app_state(Arc::new(FakeDialogs::cancelled()), Arc::new(FakeThumbnails), engine.clone());
        let session = state.new_compose_session();
        session.add_images(["only.png"]);

        assert!(session.merge().await.expect("no error").is_none());
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn failed_merge_keeps_the_collection() {
        let state = app_state(Arc::new(FakeDialogs::cancelled()), Arc::new(FakeThumbnails), Arc::new(FakeEngine::failing("engine down")));
        let session = state.new_compose_session();
        session.add_images(["a.png", "b.png"]);

        let result = session.merge().await;

        assert!(matches!(result, Err(MergeImagesError::MergeEngine(_))));
        assert_eq!(session.len(), 2);
        assert!(session.can_merge());
    }

    #[tokio::test]
    async fn options_are_replaced_wholesale() {
        let state = app_state(Arc::new(FakeDialogs::cancelled()), Arc::new(FakeThumbnails), Arc::new(FakeEngine::returning(Vec::new())));
        let session = state.new_compose_session();
        assert_eq!(session.options(), MergeOptions::default());

        session.set_direction(MergeDirection::Horizontal);
        let replacement = MergeOptions::default().with_spacing(3);
        session.update_merge_options(replacement);

        assert_eq!(session.options(), replacement);
        assert_eq!(session.options().direction, MergeDirection::Vertical);
    }

    #[tokio::test]
    async fn gesture_drives_session_reorder() {
        let state = app_state(Arc::new(FakeDialogs::cancelled()), Arc::new(FakeThumbnails), Arc::new(FakeEngine::returning(Vec::new())));
        let mut session = state.new_compose_session();
        session.add_images(["a", "b", "c", "d"]);
        let mut gesture = session.reorder_gesture();

        assert!(gesture.press(1, 10.0));
        gesture.drag_enter(3);
        assert!(gesture.drop_on(3, &mut session));

        assert_eq!(paths(&session), vec!["a", "c", "d", "b"]);
        session.clear_all_images();
        assert!(session.is_empty());
    }
}
