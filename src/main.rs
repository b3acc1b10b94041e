//! # snapsort CLI
//!
//! Moves blurred and near-duplicate photos out of a folder.
//!
//! ## Usage
//! ```bash
//! snapsort --input-dir ~/Pictures/shoot --dry-run
//! snapsort --input-dir ~/Pictures/shoot --blur-on image --keep-originals
//! ```
//!
//! Exit status is 0 on completion (including when no images are found),
//! 2 when a preflight check fails and 1 for any other error.

mod cli;

use snapsort::error::SnapsortError;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            match e {
                SnapsortError::Preflight(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
