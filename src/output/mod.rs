pub mod assembler;
pub mod page_writer;

use std::path::PathBuf;

/// Flat (depth 1) outline entry in the assembled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    /// 1-based physical page position in the final document.
    pub page_number: u32,
}

/// A per-page artifact already serialized as a single-page PDF in the
/// job's temporary directory.
#[derive(Debug, Clone)]
pub struct SerializedPage {
    pub path: PathBuf,
    pub title: String,
}
