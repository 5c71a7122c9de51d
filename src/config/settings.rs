use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{MainPage, PageSizeKey};

/// Persisted comparison settings, round-tripped through YAML.
///
/// Every field has a default, so unknown or missing keys in the file
/// fall back to the documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dpi: u32,
    pub page_size: PageSizeKey,
    /// Binarization threshold for change detection (0-255).
    pub threshold: u8,
    /// Minimum consolidated region area (in pixels) to count as a change.
    pub min_area: u32,
    /// Maximum gap (in pixels) between regions that are merged into one.
    pub merge_distance: u32,
    pub new_copy: bool,
    pub old_copy: bool,
    pub markup: bool,
    pub difference: bool,
    pub overlay: bool,
    /// Output directory. `None` means co-located with the primary source.
    pub output_path: Option<PathBuf>,
    /// Scale both pages to the target size before comparison.
    pub scale_output: bool,
    pub grayscale: bool,
    pub monochrome: bool,
    pub reduce_filesize: bool,
    pub main_page: MainPage,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dpi: 300,
            page_size: PageSizeKey::Auto,
            threshold: 128,
            min_area: 20,
            merge_distance: 50,
            new_copy: false,
            old_copy: false,
            markup: true,
            difference: true,
            overlay: true,
            output_path: None,
            scale_output: true,
            grayscale: false,
            monochrome: false,
            reduce_filesize: true,
            main_page: MainPage::New,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::CompareError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn save_to_file(&self, path: &Path) -> crate::error::Result<()> {
        let yaml = serde_yml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}
