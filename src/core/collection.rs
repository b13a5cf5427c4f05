//! Ordered collection of image references.
//!
//! Every structural change (add, remove, reorder) leaves the `order` fields
//! as exactly `0..len` in iteration order, and ids stay pairwise distinct.

use tracing::debug;

use crate::core::gesture::ReorderTarget;
use crate::core::types::{ImageHandle, ImageId, ImageReference};
use crate::utils::{ValidationError, validate_reorder};

#[derive(Debug, Clone, Default)]
pub struct ImageCollection {
    items: Vec<ImageReference>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one reference per path, preserving the input order.
    ///
    /// New entries have no thumbnail; the returned copies carry the ids the
    /// caller needs to attach thumbnails later.
    pub fn add<I, S>(&mut self, paths: I) -> Vec<ImageReference>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let base = self.items.len();
        let added: Vec<ImageReference> = paths
            .into_iter()
            .enumerate()
            .map(|(offset, path)| ImageReference::new(path, base + offset))
            .collect();

        self.items.extend(added.iter().cloned());
        debug!("Added {} images ({} total)", added.len(), self.items.len());
        added
    }

    /// Removes the entry with `id`. Returns `false` and leaves the collection
    /// untouched when no such entry exists.
    pub fn remove(&mut self, id: ImageId) -> bool {
        let Some(position) = self.position_of(id) else {
            debug!("Remove ignored, unknown image {}", id);
            return false;
        };

        self.items.remove(position);
        self.renumber();
        debug!("Removed image {} ({} remaining)", id, self.items.len());
        true
    }

    /// Moves the entry at `from` to `to`, shifting the ones in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        validate_reorder(from, to, self.items.len())?;
        if from == to {
            return Ok(());
        }

        let moved = self.items.remove(from);
        self.items.insert(to, moved);
        self.renumber();
        debug!("Moved image from {} to {}", from, to);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Stores a resolved thumbnail on the entry with `id`.
    ///
    /// Looked up by id because the entry may have moved since the thumbnail
    /// was requested. Returns `false` if the entry has been removed.
    pub fn apply_thumbnail(&mut self, id: ImageId, thumbnail: ImageHandle) -> bool {
        match self.position_of(id) {
            Some(position) => {
                self.items[position] = self.items[position].with_thumbnail(thumbnail);
                true
            }
            None => false,
        }
    }

    pub fn can_merge(&self) -> bool {
        self.items.len() > 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageReference> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageReference> {
        self.items.iter()
    }

    /// Point-in-time copy of the entries in ascending order.
    pub fn snapshot(&self) -> Vec<ImageReference> {
        self.items.clone()
    }

    /// Source paths in ascending order, as fed to a merge.
    pub fn ordered_paths(&self) -> Vec<String> {
        self.items.iter().map(|item| item.source_path.clone()).collect()
    }

    fn position_of(&self, id: ImageId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn renumber(&mut self) {
        for (index, slot) in self.items.iter_mut().enumerate() {
            if slot.order != index {
                *slot = slot.with_order(index);
            }
        }
    }
}

impl ReorderTarget for ImageCollection {
    fn reorder(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        ImageCollection::reorder(self, from, to)
    }
}
