//! Interactive-surface handlers.
//!
//! A host UI drives two stages:
//! - [`ComposeSession`]: select, drop, remove and reorder images, then merge
//! - [`PreviewSession`]: pick an export format and save the merge result

mod compose;
mod preview;

pub use compose::ComposeSession;
pub use preview::PreviewSession;
