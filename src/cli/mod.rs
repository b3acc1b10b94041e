//! # CLI Module
//!
//! Command-line interface for snapsort.
//!
//! ## Usage
//! ```bash
//! # Triage a folder in place
//! snapsort --input-dir ~/Pictures/shoot
//!
//! # Preview only, with CSV listings of what would move
//! snapsort --input-dir ~/Pictures/shoot --dry-run --print-ready --print-format csv
//!
//! # Copy into a separate folder, judging blur on the whole frame
//! snapsort --input-dir ~/Pictures/shoot --output-dir ~/triage --keep-originals --blur-on image
//! ```

mod preflight;

use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use snapsort::core::classifier::BlurMode;
use snapsort::core::organize::FolderNames;
use snapsort::core::pipeline::{Pipeline, TriageResult};
use snapsort::core::reporter::{self, PrintFormat};
use snapsort::error::Result;
use snapsort::events::{
    AnalyzeEvent, Event, EventChannel, ExecuteEvent, PipelineEvent, ScanEvent,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;

/// Sort blurred and near-duplicate photos into their own folders
#[derive(Parser, Debug)]
#[command(name = "snapsort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing images to process
    #[arg(long)]
    input_dir: PathBuf,

    /// Hamming distance threshold for near-duplicates
    #[arg(long, default_value_t = 5)]
    duplicate_threshold: u32,

    /// Variance of Laplacian threshold for blur detection
    #[arg(long, default_value_t = 100.0)]
    blur_threshold: f64,

    /// Folder name for blurred images
    #[arg(long, default_value = "blurred")]
    blur_folder: String,

    /// Folder name for partially blurred images
    #[arg(long, default_value = "partialBlurred")]
    partial_blur_folder: String,

    /// Folder name for slightly blurred images
    #[arg(long, default_value = "slightlyBlurred")]
    slight_blur_folder: String,

    /// Folder name for duplicate images
    #[arg(long, default_value = "duplicate")]
    duplicate_folder: String,

    /// Comma-separated list of allowed file extensions
    #[arg(long, default_value = ".jpg,.jpeg,.nef")]
    extensions: String,

    /// Include subdirectories recursively
    #[arg(long)]
    recursive: bool,

    /// Show planned moves but do not modify files
    #[arg(long)]
    dry_run: bool,

    /// Max workers for parallel analysis
    #[arg(long)]
    max_workers: Option<usize>,

    /// Logging level: DEBUG/INFO/WARN/ERROR (RUST_LOG takes precedence)
    #[arg(long, default_value = "INFO")]
    log_level: String,

    /// Base output directory (defaults to the input directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Copy instead of move
    #[arg(long)]
    keep_originals: bool,

    /// Blur classification target
    #[arg(long, value_enum, default_value = "faces")]
    blur_on: BlurTarget,

    /// Minimum percent of blurred faces to classify as partially blurred
    #[arg(long, default_value_t = 50.0, value_parser = parse_percent)]
    partial_blur_min_percent: f64,

    /// Route blurred duplicates by their blur tier instead of to the duplicate folder
    #[arg(long)]
    prefer_blur: bool,

    /// SeetaFace model file for face detection. Without it no faces are found and
    /// `--blur-on faces` behaves like `--blur-on image`
    #[arg(long)]
    face_model: Option<PathBuf>,

    /// Print files scanned successfully (grouped by extension)
    #[arg(long)]
    print_scanned: bool,

    /// Print files planned to move/copy (grouped by extension)
    #[arg(long)]
    print_ready: bool,

    /// Print per-file blur metrics and face counts
    #[arg(long)]
    print_metrics: bool,

    /// Output format for printed lists. CSV fields containing a comma, quote or
    /// newline are double-quoted
    #[arg(long, value_enum, default_value = "text")]
    print_format: ListFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BlurTarget {
    /// Per-face blur, falling back to the whole image without faces
    Faces,
    /// Whole-image blur only
    Image,
}

impl From<BlurTarget> for BlurMode {
    fn from(target: BlurTarget) -> Self {
        match target {
            BlurTarget::Faces => BlurMode::FaceAware,
            BlurTarget::Image => BlurMode::WholeImage,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListFormat {
    /// Human-readable listing
    Text,
    /// Comma-separated values with a header row
    Csv,
}

impl From<ListFormat> for PrintFormat {
    fn from(format: ListFormat) -> Self {
        match format {
            ListFormat::Text => PrintFormat::Text,
            ListFormat::Csv => PrintFormat::Csv,
        }
    }
}

fn parse_percent(value: &str) -> std::result::Result<f64, String> {
    let percent: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if (0.0..=100.0).contains(&percent) {
        Ok(percent)
    } else {
        Err(format!("{} is not between 0 and 100", percent))
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    snapsort::init_tracing(&cli.log_level);
    run_triage(cli)
}

fn run_triage(cli: Cli) -> Result<()> {
    let input_dir = preflight::resolve_input(&cli.input_dir)?;
    let output_dir = cli.output_dir.as_deref().map(preflight::absolute);

    if !cli.dry_run {
        let base = output_dir.as_deref().unwrap_or(&input_dir);
        preflight::check_writable(base, &input_dir, cli.keep_originals)?;
    }

    let mut builder = Pipeline::builder()
        .input_dir(&input_dir)
        .duplicate_threshold(cli.duplicate_threshold)
        .blur_threshold(cli.blur_threshold)
        .partial_blur_min_percent(cli.partial_blur_min_percent)
        .blur_mode(cli.blur_on.into())
        .prefer_duplicate_over_blur(!cli.prefer_blur)
        .folders(FolderNames {
            blurred: cli.blur_folder.clone(),
            partially_blurred: cli.partial_blur_folder.clone(),
            slightly_blurred: cli.slight_blur_folder.clone(),
            duplicate: cli.duplicate_folder.clone(),
        })
        .extensions([cli.extensions.as_str()])
        .recursive(cli.recursive)
        .dry_run(cli.dry_run)
        .keep_originals(cli.keep_originals);

    if let Some(dir) = output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(workers) = cli.max_workers {
        builder = builder.max_workers(workers);
    }
    if let Some(model) = &cli.face_model {
        builder = builder.face_model(preflight::absolute(model));
    }

    let pipeline = builder.build();

    let (sender, receiver) = EventChannel::new();
    let action = if cli.keep_originals { "Copying" } else { "Moving" };

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:<10} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Scan(ScanEvent::Completed { total_photos }) => {
                    progress_clone.set_length(total_photos as u64);
                }
                Event::Analyze(AnalyzeEvent::Started { .. }) => {
                    progress_clone.set_message("Analyzing");
                    progress_clone.set_position(0);
                }
                Event::Analyze(AnalyzeEvent::Progress(p)) => {
                    progress_clone.set_position(p.completed as u64);
                }
                Event::Execute(ExecuteEvent::Started { total, .. }) => {
                    progress_clone.set_message(action);
                    progress_clone.set_length(total as u64);
                    progress_clone.set_position(0);
                }
                Event::Execute(ExecuteEvent::Progress { completed, .. }) => {
                    progress_clone.set_position(completed as u64);
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    progress_clone.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let outcome = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    progress.finish_and_clear();

    let result = outcome?;
    if result.records.is_empty() {
        return Ok(());
    }

    print_listings(&cli, &result)?;
    print_summary(&result);

    Ok(())
}

fn print_listings(cli: &Cli, result: &TriageResult) -> io::Result<()> {
    let format: PrintFormat = cli.print_format.into();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.print_scanned {
        reporter::write_scanned(&result.records, format, &mut out)?;
    }
    if cli.print_metrics {
        reporter::write_metrics(&result.records, &result.dispositions, format, &mut out)?;
    }
    if cli.print_ready {
        reporter::write_ready(&result.plans, format, &mut out)?;
    }
    out.flush()
}

fn print_summary(result: &TriageResult) {
    let term = Term::stdout();
    let marker = if result.summary.errors > 0 {
        style("!").yellow().bold()
    } else {
        style("✓").green().bold()
    };
    term.write_line(&format!(
        "{} {}",
        marker,
        reporter::format_summary(&result.summary)
    ))
    .ok();
}
