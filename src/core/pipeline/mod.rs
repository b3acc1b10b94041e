//! # Pipeline Module
//!
//! Orchestrates the full triage workflow.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover photos under the input directory, skipping output folders
//! 2. **Analyze** - Decode, fingerprint and measure blur on a worker pool
//! 3. **Classify** - Cluster duplicates, tier blur, resolve one disposition per photo
//! 4. **Execute** - Move or copy into category folders (or just log, in dry-run)
//!
//! ## Parallelism
//! Only analysis is parallel (rayon). Each worker owns its own lazily-built
//! face detector. Results are merged back into discovery order before
//! clustering, so completion order never affects the outcome. Everything
//! after analysis runs sequentially.

mod config;
mod executor;

pub use config::{PipelineBuilder, TriageConfig};
pub use executor::{Pipeline, TriageResult};
