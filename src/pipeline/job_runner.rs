use std::path::{Path, PathBuf};
use std::time::Duration;

use rayon::prelude::*;

use crate::config::{Configuration, MainPage};
use crate::diff::analyzer::analyze;
use crate::error::CompareError;
use crate::output::assembler::{OutputNaming, assemble};
use crate::output::{SerializedPage, page_writer};
use crate::pipeline::progress::{CancelFlag, ProgressSink};
use crate::render::rasterizer::Rasterizer;
use crate::stats::StatisticsAccumulator;

/// Delay the UI should wait after the completion signal before closing.
const COMPLETION_DELAY: Duration = Duration::from_secs(5);

/// One comparison job: two input paths plus the validated configuration.
pub struct JobSpec {
    /// First input (the "new" document).
    pub path_new: PathBuf,
    /// Second input (the "old" document).
    pub path_old: PathBuf,
    pub config: Configuration,
    pub cancel: CancelFlag,
}

pub struct JobOutcome {
    pub output_path: PathBuf,
    pub pages_processed: u32,
    pub total_changes: u64,
}

/// Run a comparison job to completion, reporting progress and log
/// lines to the sink. The completion signal fires on every exit path;
/// on a fatal error a terminal log line is emitted and no output
/// artifact is written.
pub fn run_job(spec: &JobSpec, sink: &dyn ProgressSink) -> crate::error::Result<JobOutcome> {
    let result = execute(spec, sink);
    if let Err(e) = &result {
        sink.log(&format!("{e}"));
    }
    sink.completed(COMPLETION_DELAY);
    result
}

fn execute(spec: &JobSpec, sink: &dyn ProgressSink) -> crate::error::Result<JobOutcome> {
    let config = &spec.config;

    sink.log(&format!(
        "Processing files:\n    {}\n    {}",
        spec.path_new.display(),
        spec.path_old.display()
    ));

    let rasterizer = Rasterizer::new()?;
    let (primary_path, secondary_path) = match config.main_page {
        MainPage::New => (&spec.path_new, &spec.path_old),
        MainPage::Old => (&spec.path_old, &spec.path_new),
    };
    // Both sources stay open read-only for the duration of the job.
    let primary = rasterizer.open(primary_path)?;
    let secondary = rasterizer.open(secondary_path)?;

    // Auto page size derives from the primary document's first page.
    let page_size = match config.page_size.dimensions() {
        Some(size) => size,
        None => primary.page_size_inches()?,
    };
    let target_size = config.scale_output.then_some(page_size);

    let total_pages = primary.page_count().max(secondary.page_count());
    if total_pages == 0 {
        return Err(CompareError::document("both documents are empty"));
    }
    sink.log(&format!("Total pages {total_pages}."));

    let naming = OutputNaming {
        directory: config.output_path.clone().unwrap_or_else(|| {
            primary_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf()
        }),
        base_name: primary_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Document".to_string()),
    };

    sink.log("Creating temporary directory...");
    // Dropped on every exit path, removing all intermediate documents.
    let temp_dir = tempfile::tempdir()?;
    sink.log(&format!(
        "Temporary directory created: {}",
        temp_dir.path().display()
    ));

    let mut stats = StatisticsAccumulator::new(
        total_pages,
        &spec.path_new,
        &spec.path_old,
        primary_path,
    );
    let mut serialized: Vec<SerializedPage> = Vec::new();
    let mut progress = 0.0f64;
    let progress_per_page = 100.0 / total_pages as f64;

    for page_index in 0..total_pages {
        if spec.cancel.is_cancelled() {
            return Err(CompareError::Cancelled);
        }

        sink.log(&format!(
            "Processing page {} of {total_pages}...",
            page_index + 1
        ));
        sink.log("Converting main page...");
        let image_primary = primary.rasterize(page_index, config.dpi, target_size)?;
        sink.log("Converting secondary page...");
        let image_secondary = secondary.rasterize(page_index, config.dpi, target_size)?;

        sink.log("Marking differences...");
        let artifact_set = analyze(
            page_index,
            &image_primary,
            &image_secondary,
            config,
            page_size,
        )?;
        drop(image_primary);
        drop(image_secondary);

        stats.record(page_index, artifact_set.change_count);

        sink.log("Saving output files...");
        let encoded: Vec<crate::error::Result<Vec<u8>>> = artifact_set
            .artifacts
            .par_iter()
            .map(|artifact| {
                page_writer::single_page_pdf(
                    &artifact.image,
                    config.dpi,
                    config.color_mode,
                    config.reduce_filesize,
                )
            })
            .collect();

        for (artifact_index, (artifact, bytes)) in artifact_set
            .artifacts
            .iter()
            .zip(encoded)
            .enumerate()
        {
            let file = temp_dir
                .path()
                .join(format!("{page_index}_{artifact_index}.pdf"));
            std::fs::write(&file, bytes?)?;
            serialized.push(SerializedPage {
                path: file,
                title: format!("{} - Page {}", artifact.kind.label(), page_index + 1),
            });
        }

        progress += progress_per_page;
        sink.progress(progress.min(100.0) as u8);
    }

    sink.log("Creating statistics page...");
    let report = stats.finalize();

    sink.log("Compiling PDF from output folder...");
    sink.log("Saving final PDF...");
    let assembled = assemble(&serialized, &report, &naming)?;
    sink.log(&format!(
        "Comparison file created: {}",
        assembled.path.display()
    ));

    Ok(JobOutcome {
        output_path: assembled.path,
        pages_processed: total_pages,
        total_changes: stats.total_changes(),
    })
}
