//! # Error Module
//!
//! Error types for the photo triage engine.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file failures stay local** - an unreadable photo or a failed move
//!   is recorded and counted, only preflight failures abort a run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SnapsortError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Analysis error: {0}")]
    Analyze(#[from] AnalyzeError),

    #[error("Execution error: {0}")]
    Execute(#[from] ExecuteError),

    #[error("Preflight check failed: {0}")]
    Preflight(#[from] PreflightError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while discovering photos
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while extracting features from a single image.
///
/// These never abort a run: the pipeline turns them into an error record.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Face detector could not be loaded from {path}: {reason}")]
    DetectorUnavailable { path: PathBuf, reason: String },

    #[error("Analysis deadline exceeded before {path} was processed")]
    DeadlineExceeded { path: PathBuf },

    #[error("Analysis of {path} aborted unexpectedly: {reason}")]
    WorkerFault { path: PathBuf, reason: String },
}

/// Errors that occur while moving or copying a planned file
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Source file not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to {verb} {from} -> {to}: {source}")]
    Transfer {
        verb: &'static str,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Conditions that prevent a run from starting
#[derive(Error, Debug)]
pub enum PreflightError {
    #[error("Input directory not found: {path}")]
    InputMissing { path: PathBuf },

    #[error(
        "Output directory is not writable: {path}. Use --output-dir to a writable location or fix permissions."
    )]
    OutputNotWritable { path: PathBuf },

    #[error(
        "Input directory is not writable for moving files: {path}. Fix permissions, use --keep-originals, or choose a different --output-dir."
    )]
    InputNotWritable { path: PathBuf },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SnapsortError>;
