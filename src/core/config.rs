use serde::{Deserialize, Serialize};

use crate::core::gesture::DEFAULT_HANDLE_REGION_WIDTH;
use crate::core::types::MergeOptions;
use crate::utils::SUPPORTED_INPUT_EXTENSIONS;

/// Session-wide settings. Missing keys fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub thumbnail_max_width: u32,
    pub thumbnail_max_height: u32,
    /// Width of the drag handle on each collection item
    pub handle_region_width: f32,
    /// Extensions offered when selecting images
    pub open_filters: Vec<String>,
    pub suggested_export_name: String,
    pub default_merge_options: MergeOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            thumbnail_max_width: 200,
            thumbnail_max_height: 200,
            handle_region_width: DEFAULT_HANDLE_REGION_WIDTH,
            open_filters: SUPPORTED_INPUT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            suggested_export_name: "merged".to_string(),
            default_merge_options: MergeOptions::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MergeDirection;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json(
            r#"{ "thumbnailMaxWidth": 96, "defaultMergeOptions": { "direction": "horizontal", "spacing": 4 } }"#,
        )
        .expect("valid config");

        assert_eq!(config.thumbnail_max_width, 96);
        assert_eq!(config.thumbnail_max_height, 200);
        assert_eq!(config.default_merge_options.direction, MergeDirection::Horizontal);
        assert_eq!(config.default_merge_options.spacing, 4);
        assert_eq!(config.suggested_export_name, "merged");
        assert_eq!(config.open_filters.len(), 6);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SessionConfig::from_json("{ not json").is_err());
    }
}
