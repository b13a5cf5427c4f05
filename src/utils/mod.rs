pub mod error;
pub mod formats;
pub mod logging;
pub mod validation;

pub use error::{EngineError, MergeImagesError, MergeImagesResult, ValidationError};
pub use formats::{
    ALL_EXPORT_FORMATS, ExportFormat, SUPPORTED_INPUT_EXTENSIONS, UnsupportedFormat,
    format_from_extension,
};
pub use logging::init_logging;
pub use validation::{validate_destination, validate_export_quality, validate_reorder};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Every critical section in this crate leaves its data consistent before it
/// can panic, so a poisoned lock is still safe to use.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
