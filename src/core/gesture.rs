//! Pointer-drag recognition for reordering collection items.
//!
//! The controller only tracks gesture state and highlight; the actual move is
//! delegated to a [`ReorderTarget`] when a drag ends in a drop.

use tracing::{debug, warn};

use crate::utils::ValidationError;

/// Width, in item-local pixels, of the grab handle on the left of each item.
pub const DEFAULT_HANDLE_REGION_WIDTH: f32 = 30.0;

/// Receiver of the reorder a completed drag produces.
pub trait ReorderTarget {
    fn reorder(&mut self, from: usize, to: usize) -> Result<(), ValidationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging { source: usize },
}

/// What is being dragged over the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPayload {
    /// Files dragged in from outside the application
    ExternalFiles,
    /// An item of this collection
    Item,
    Other,
}

/// Feedback the host shows while something hovers over the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEffect {
    None,
    Copy,
    Move,
}

#[derive(Debug, Clone)]
pub struct ReorderGesture {
    state: GestureState,
    highlighted: Option<usize>,
    handle_width: f32,
}

impl Default for ReorderGesture {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_REGION_WIDTH)
    }
}

impl ReorderGesture {
    pub fn new(handle_width: f32) -> Self {
        Self {
            state: GestureState::Idle,
            highlighted: None,
            handle_width,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Pointer pressed on item `index` at horizontal offset `pointer_x`.
    ///
    /// Starts a drag only when the press lands on the handle region, so other
    /// pointer interactions on the item are left alone. Returns whether a
    /// drag started.
    pub fn press(&mut self, index: usize, pointer_x: f32) -> bool {
        if self.is_dragging() || !(0.0..=self.handle_width).contains(&pointer_x) {
            return false;
        }

        debug!("Drag started on item {}", index);
        self.state = GestureState::Dragging { source: index };
        true
    }

    pub fn drag_over(&self, payload: DragPayload) -> DragEffect {
        match payload {
            DragPayload::ExternalFiles => DragEffect::Copy,
            DragPayload::Item if self.is_dragging() => DragEffect::Move,
            _ => DragEffect::None,
        }
    }

    pub fn drag_enter(&mut self, index: usize) {
        if self.is_dragging() {
            self.highlighted = Some(index);
        }
    }

    pub fn drag_leave(&mut self, index: usize) {
        if self.is_dragging() && self.highlighted == Some(index) {
            self.highlighted = None;
        }
    }

    /// Ends the drag on item `index`, asking `target` to move the dragged
    /// item there. Returns `true` if a reorder was issued and accepted.
    pub fn drop_on<T>(&mut self, index: usize, target: &mut T) -> bool
    where
        T: ReorderTarget + ?Sized,
    {
        let GestureState::Dragging { source } = self.state else {
            return false;
        };
        self.reset();

        match target.reorder(source, index) {
            Ok(()) => true,
            Err(e) => {
                warn!("Reorder from {} to {} rejected: {}", source, index, e);
                false
            }
        }
    }

    /// Abandons the drag without reordering anything.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("Drag cancelled");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.highlighted = None;
    }
}
