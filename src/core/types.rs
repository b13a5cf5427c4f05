//! Core value types shared by the collection, the merge orchestrator and the
//! export controller.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::ExportFormat;

/// Opaque identity of one image reference, stable across reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    /// Generates a fresh, never-before-seen id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Shared handle to a decoded image.
///
/// Used both for thumbnails and for merge results. Cloning is cheap and two
/// handles compare equal only when they share the same allocation.
#[derive(Clone)]
pub struct ImageHandle(Arc<DynamicImage>);

impl ImageHandle {
    pub fn new(image: DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    /// The 1×1 transparent image returned for a merge with no inputs.
    pub fn placeholder() -> Self {
        Self::new(DynamicImage::new_rgba8(1, 1))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.0
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({}×{})", self.width(), self.height())
    }
}

impl From<DynamicImage> for ImageHandle {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

/// One entry of the ordered collection.
///
/// Treated as an immutable value: the `with_*` methods return an updated copy
/// that the owner stores back into its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReference {
    pub id: ImageId,
    pub source_path: String,
    /// Rendered preview; absent until (and unless) the thumbnail service delivers one
    pub thumbnail: Option<ImageHandle>,
    /// Dense zero-based rank within the collection
    pub order: usize,
}

impl ImageReference {
    pub fn new(source_path: impl Into<String>, order: usize) -> Self {
        Self {
            id: ImageId::new(),
            source_path: source_path.into(),
            thumbnail: None,
            order,
        }
    }

    pub fn with_order(&self, order: usize) -> Self {
        Self {
            order,
            ..self.clone()
        }
    }

    pub fn with_thumbnail(&self, thumbnail: ImageHandle) -> Self {
        Self {
            thumbnail: Some(thumbnail),
            ..self.clone()
        }
    }
}

/// Stacking direction of a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeDirection {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Fill used for spacing gaps and uncovered canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "color")]
pub enum Background {
    #[default]
    Transparent,
    Solid(Rgba),
}

/// User-configurable merge settings. Replaced wholesale on change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeOptions {
    pub direction: MergeDirection,
    /// Pixel gap between consecutive images
    pub spacing: u32,
    pub background: Background,
}

impl MergeOptions {
    pub fn with_direction(self, direction: MergeDirection) -> Self {
        Self { direction, ..self }
    }

    pub fn with_spacing(self, spacing: u32) -> Self {
        Self { spacing, ..self }
    }

    pub fn with_background(self, background: Background) -> Self {
        Self { background, ..self }
    }
}

/// One input of a merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSource {
    pub id: ImageId,
    pub path: String,
    pub order: usize,
}

/// Payload handed to the external merge engine. Built fresh per merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub images: Vec<MergeSource>,
    pub options: MergeOptions,
}

impl MergeRequest {
    /// Pairs each path with a fresh id and its positional index.
    pub fn from_ordered_paths<S: AsRef<str>>(paths: &[S], options: MergeOptions) -> Self {
        let images = paths
            .iter()
            .enumerate()
            .map(|(order, path)| MergeSource {
                id: ImageId::new(),
                path: path.as_ref().to_string(),
                order,
            })
            .collect();

        Self { images, options }
    }
}

/// Payload handed to the external exporter.
///
/// `quality` is only ever `Some` for lossy formats.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub image: ImageHandle,
    pub format: ExportFormat,
    pub quality: Option<u32>,
    pub destination: PathBuf,
}
