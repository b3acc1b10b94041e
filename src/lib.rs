//! # snapsort
//!
//! Photo triage: finds near-duplicate and blurred photos and moves them into
//! category folders.
//!
//! ## Core Philosophy
//! - **Deterministic** - the same folder and settings always give the same plan
//! - **Per-file failures stay local** - an unreadable photo is counted, never fatal
//! - **Dry-run first** - every move can be previewed without touching a file
//!
//! ## Architecture
//! - `core` - The triage engine (discovery, analysis, classification, moves)
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//!
//! ## Example
//! ```rust,ignore
//! use snapsort::core::pipeline::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .input_dir("/Users/me/Pictures/shoot")
//!     .dry_run(true)
//!     .build()
//!     .run()?;
//! println!("{} duplicates", result.summary.duplicates);
//! ```

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SnapsortError};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the binary.
///
/// `RUST_LOG` wins when set; otherwise `level` is used (`DEBUG`, `INFO`,
/// `WARN`/`WARNING`, `ERROR`, case-insensitive), falling back to `info`.
/// Calling it twice is harmless.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_directive(level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}
