use crate::utils::{ExportFormat, ValidationError};

/// Validates a reorder move against the current collection length
pub fn validate_reorder(from: usize, to: usize, len: usize) -> Result<(), ValidationError> {
    for index in [from, to] {
        if index >= len {
            return Err(ValidationError::index_out_of_range(index, len));
        }
    }
    Ok(())
}

/// Resolves the quality that will actually be sent with an export.
///
/// Lossless formats never carry a quality, whatever the caller supplied.
/// Lossy formats keep the supplied value, which must lie in `[0, 100]`.
pub fn validate_export_quality(
    format: ExportFormat,
    quality: Option<u32>,
) -> Result<Option<u32>, ValidationError> {
    if !format.is_lossy() {
        return Ok(None);
    }

    match quality {
        Some(q) if q > 100 => Err(ValidationError::QualityOutOfRange(q)),
        other => Ok(other),
    }
}

/// Validates the export destination path
pub fn validate_destination(path: &str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::EmptyDestination);
    }
    Ok(())
}
