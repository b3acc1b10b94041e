//! # Core Module
//!
//! The GUI-agnostic photo triage engine.
//!
//! ## Modules
//! - `scanner` - Discovers photos under the input directory
//! - `decoder` - Decodes standard and RAW images to pixels
//! - `hasher` - Computes perceptual hashes
//! - `quality` - Measures sharpness (variance of the Laplacian)
//! - `faces` - Worker-local face detection
//! - `analyzer` - Turns one file into one analysis record
//! - `comparator` - Clusters near-duplicates
//! - `classifier` - Blur tiers and final dispositions
//! - `organize` - Plans and executes moves
//! - `pipeline` - Orchestrates the full workflow
//! - `reporter` - Listings and the run summary

pub mod analyzer;
pub mod classifier;
pub mod comparator;
pub mod decoder;
pub mod faces;
pub mod hasher;
pub mod organize;
pub mod pipeline;
pub mod quality;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use analyzer::{AnalysisRecord, Features};
pub use classifier::{BlurMode, BlurTier, Disposition};
pub use comparator::{Clustering, DuplicateGroup};
pub use organize::MovePlan;
pub use scanner::PhotoFile;
