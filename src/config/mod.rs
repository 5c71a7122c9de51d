pub mod options;
pub mod settings;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use settings::Settings;

/// Page-size profile for the comparison output.
///
/// `Auto` derives the size from the primary document's first page,
/// assuming the PDF-native 72 points per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSizeKey {
    Auto,
    Letter,
    AnsiA,
    AnsiB,
    AnsiC,
    AnsiD,
}

impl PageSizeKey {
    /// Fixed size in inches, or `None` for `Auto`.
    pub fn dimensions(self) -> Option<(f32, f32)> {
        match self {
            PageSizeKey::Auto => None,
            PageSizeKey::Letter => Some((8.5, 11.0)),
            PageSizeKey::AnsiA => Some((11.0, 8.5)),
            PageSizeKey::AnsiB => Some((17.0, 11.0)),
            PageSizeKey::AnsiC => Some((22.0, 17.0)),
            PageSizeKey::AnsiD => Some((34.0, 22.0)),
        }
    }

    /// Parse a CLI token such as `AUTO` or `ANSI_B`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AUTO" => Some(PageSizeKey::Auto),
            "LETTER" => Some(PageSizeKey::Letter),
            "ANSI_A" => Some(PageSizeKey::AnsiA),
            "ANSI_B" => Some(PageSizeKey::AnsiB),
            "ANSI_C" => Some(PageSizeKey::AnsiC),
            "ANSI_D" => Some(PageSizeKey::AnsiD),
            _ => None,
        }
    }
}

/// Which of the two inputs is the primary (main focus) document.
///
/// `New` designates the first path, `Old` the second, independent of
/// argument order on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainPage {
    New,
    Old,
}

/// Output color mode. Monochrome takes precedence over grayscale when
/// both persisted flags are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Color,
    Grayscale,
    Monochrome,
}

/// Which artifact images to include, in canonical order:
/// primary copy, secondary copy, markup, difference, overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactFlags {
    pub new_copy: bool,
    pub old_copy: bool,
    pub markup: bool,
    pub difference: bool,
    pub overlay: bool,
}

/// Immutable, validated per-job configuration.
///
/// Constructed once from [`Settings`] before the job starts; invalid
/// values are rejected here rather than at use time.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub dpi: u32,
    pub page_size: PageSizeKey,
    pub threshold: u8,
    pub min_area: u32,
    pub merge_distance: u32,
    pub include: ArtifactFlags,
    pub output_path: Option<PathBuf>,
    pub scale_output: bool,
    pub color_mode: ColorMode,
    pub reduce_filesize: bool,
    pub main_page: MainPage,
}

impl Configuration {
    pub fn from_settings(s: &Settings) -> crate::error::Result<Self> {
        if s.dpi == 0 {
            return Err(crate::error::CompareError::config(
                "DPI must be greater than zero",
            ));
        }

        let color_mode = if s.monochrome {
            ColorMode::Monochrome
        } else if s.grayscale {
            ColorMode::Grayscale
        } else {
            ColorMode::Color
        };

        Ok(Configuration {
            dpi: s.dpi,
            page_size: s.page_size,
            threshold: s.threshold,
            min_area: s.min_area,
            merge_distance: s.merge_distance,
            include: ArtifactFlags {
                new_copy: s.new_copy,
                old_copy: s.old_copy,
                markup: s.markup,
                difference: s.difference,
                overlay: s.overlay,
            },
            output_path: s.output_path.clone(),
            scale_output: s.scale_output,
            color_mode,
            reduce_filesize: s.reduce_filesize,
            main_page: s.main_page,
        })
    }
}

/// Load `pdf_compare.yaml` from the given directory if present,
/// otherwise return defaults.
pub fn load_settings(dir: &Path) -> crate::error::Result<Settings> {
    let settings_path = dir.join("pdf_compare.yaml");

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}
