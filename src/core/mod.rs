//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`ImageCollection`]: the ordered, reorderable set of image references
//! - [`ReorderGesture`]: drag recognition that feeds reorders into a collection
//! - [`AppState`]: shared collaborators and configuration
//! - [`services`]: contracts for the external dialog, thumbnail, merge and export services

mod collection;
mod config;
mod gesture;
pub mod services;
mod state;
mod types;

pub use collection::ImageCollection;
pub use config::SessionConfig;
pub use gesture::{
    DEFAULT_HANDLE_REGION_WIDTH, DragEffect, DragPayload, GestureState, ReorderGesture,
    ReorderTarget,
};
pub use state::AppState;
pub use types::{
    Background, ExportRequest, ImageHandle, ImageId, ImageReference, MergeDirection,
    MergeOptions, MergeRequest, MergeSource, Rgba,
};
