use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output formats the external exporter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    PNG,
    JPEG,
    WebP,
    BMP,
    TIFF,
}

/// Every export format, in the order the preview offers them.
pub const ALL_EXPORT_FORMATS: [ExportFormat; 5] = [
    ExportFormat::PNG,
    ExportFormat::JPEG,
    ExportFormat::WebP,
    ExportFormat::BMP,
    ExportFormat::TIFF,
];

/// Extensions offered by the open-file dialog.
pub const SUPPORTED_INPUT_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "tiff"];

impl ExportFormat {
    /// Lossy formats are the only ones that accept a quality value
    pub fn is_lossy(&self) -> bool {
        matches!(self, Self::JPEG | Self::WebP)
    }

    /// Quality used when the caller has not picked one (lossy formats only)
    pub fn default_quality(&self) -> Option<u32> {
        match self {
            Self::JPEG => Some(85),
            Self::WebP => Some(80),
            Self::PNG | Self::BMP | Self::TIFF => None,
        }
    }

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::PNG => &["png"],
            Self::JPEG => &["jpg", "jpeg"],
            Self::WebP => &["webp"],
            Self::BMP => &["bmp"],
            Self::TIFF => &["tiff", "tif"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }

    /// Get the primary extension for this format
    pub fn primary_extension(&self) -> &str {
        self.extensions()[0]
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PNG => "PNG",
            Self::JPEG => "JPEG",
            Self::WebP => "WEBP",
            Self::BMP => "BMP",
            Self::TIFF => "TIFF",
        };
        f.write_str(name)
    }
}

/// Returned when a name or extension maps to no export format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported image format: {0}")]
pub struct UnsupportedFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim().trim_start_matches('.').to_lowercase();
        ALL_EXPORT_FORMATS
            .into_iter()
            .find(|format| format.matches_extension(&name))
            .ok_or(UnsupportedFormat(name))
    }
}

/// Get format from a destination path's extension
pub fn format_from_extension(path: &str) -> Result<ExportFormat, UnsupportedFormat> {
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| UnsupportedFormat(format!("file has no extension: {path}")))?;

    ExportFormat::from_str(ext)
}
