use std::path::Path;
use std::process::ExitCode;

use pdf_compare::config::settings::Settings;
use pdf_compare::config::{self, Configuration, options};
use pdf_compare::pipeline::job_runner::{JobSpec, run_job};
use pdf_compare::pipeline::progress::{CancelFlag, TracingSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_compare {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    // The last two arguments are the document paths; everything before
    // them is a key:value option token.
    let paths = &args[args.len() - 2..];
    let options = &args[..args.len() - 2];

    if !Path::new(&paths[0]).exists() || !Path::new(&paths[1]).exists() {
        eprintln!("ERROR: Arguments must contain 2 existing document paths.");
        return ExitCode::FAILURE;
    }
    if !has_pdf_extension(&paths[0]) && !has_pdf_extension(&paths[1]) {
        eprintln!("ERROR: Arguments must contain pdf paths.");
        return ExitCode::FAILURE;
    }

    let mut settings: Settings = match config::load_settings(Path::new(".")) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR: Failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    options::apply_options(&mut settings, options);

    let configuration = match Configuration::from_settings(&settings) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    let spec = JobSpec {
        path_new: paths[0].clone().into(),
        path_old: paths[1].clone().into(),
        config: configuration,
        cancel: CancelFlag::new(),
    };

    match run_job(&spec, &TracingSink) {
        Ok(outcome) => {
            eprintln!(
                "OK: {} pages, {} differences -> {}",
                outcome.pages_processed,
                outcome.total_changes,
                outcome.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn has_pdf_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn print_usage() {
    eprintln!("Usage: pdf_compare [options] <pathA> <pathB>");
    eprintln!("  Compare two PDF documents and produce a visual diff document.");
    eprintln!();
    eprintln!("Options (key:value tokens):");
    eprintln!("  -ps:SIZE, --page_size:SIZE    AUTO, LETTER, ANSI_A, ANSI_B, ANSI_C, ANSI_D");
    eprintln!("  -dpi:LEVEL                    Rendering resolution (default 300)");
    eprintln!("  -o:PATH, --output:PATH        Output directory (default: source directory)");
    eprintln!("  -s:BOOL, --scale:BOOL         Scale pages to the same size (default True)");
    eprintln!("  -bw:BOOL, --black_white:BOOL  Monochrome output (default False)");
    eprintln!("  -gs:BOOL, --grayscale:BOOL    Grayscale output (default False)");
    eprintln!("  -r:BOOL, --reduce_filesize:BOOL  Lower quality, smaller file (default True)");
    eprintln!("  -mp:PAGE, --main_page:PAGE    NEW (first path) or OLD (second path)");
}
