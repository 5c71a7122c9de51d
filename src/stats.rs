use std::path::Path;

/// Aggregates per-page significant-change counts into the document
/// level comparison report.
#[derive(Debug)]
pub struct StatisticsAccumulator {
    total_pages: u32,
    file_new: String,
    file_old: String,
    primary: String,
    total_changes: u64,
    /// (0-based page index, change count) for pages with changes.
    pages_with_changes: Vec<(u32, u32)>,
}

impl StatisticsAccumulator {
    pub fn new(total_pages: u32, file_new: &Path, file_old: &Path, primary: &Path) -> Self {
        StatisticsAccumulator {
            total_pages,
            file_new: file_new.display().to_string(),
            file_old: file_old.display().to_string(),
            primary: primary.display().to_string(),
            total_changes: 0,
            pages_with_changes: Vec::new(),
        }
    }

    /// Record the significant-change count for one page. Pages without
    /// changes contribute to nothing but are accepted for symmetry.
    pub fn record(&mut self, page_index: u32, change_count: u32) {
        if change_count > 0 {
            self.total_changes += change_count as u64;
            self.pages_with_changes.push((page_index, change_count));
        }
    }

    pub fn total_changes(&self) -> u64 {
        self.total_changes
    }

    /// Render the plain-text report. Per-page lines are emitted in
    /// ascending page order regardless of recording order.
    pub fn finalize(&self) -> String {
        let mut pages = self.pages_with_changes.clone();
        pages.sort_by_key(|&(page_index, _)| page_index);

        let mut report = format!(
            "Document Comparison Report\n\
             \n\
             Total Pages: {}\n\
             Files Compared:\n\
             \x20   {}\n\
             \x20   {}\n\
             Main Page: {}\n\
             Total Differences: {}\n\
             Pages with differences:\n",
            self.total_pages, self.file_new, self.file_old, self.primary, self.total_changes
        );
        for (page_index, count) in pages {
            report.push_str(&format!("    Page {} Changes: {}\n", page_index + 1, count));
        }
        report
    }
}
