pub mod analyzer;
pub mod regions;

use image::RgbImage;

/// One of the generated per-page comparison images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    NewCopy,
    OldCopy,
    Markup,
    Difference,
    Overlay,
}

impl ArtifactKind {
    /// Title used for table-of-contents entries.
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::NewCopy => "New Copy",
            ArtifactKind::OldCopy => "Old Copy",
            ArtifactKind::Markup => "Markup",
            ArtifactKind::Difference => "Difference",
            ArtifactKind::Overlay => "Overlay",
        }
    }
}

#[derive(Debug)]
pub struct PageArtifact {
    pub kind: ArtifactKind,
    pub image: RgbImage,
}

/// Output images for one page index, in canonical order, plus the
/// number of significant change regions found on that page.
#[derive(Debug)]
pub struct DiffArtifactSet {
    pub page_index: u32,
    pub artifacts: Vec<PageArtifact>,
    pub change_count: u32,
}
