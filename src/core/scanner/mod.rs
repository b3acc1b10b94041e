//! # Scanner Module
//!
//! Discovers candidate photos under an input directory.
//!
//! Discovery is filtered by extension (`jpg`, `jpeg`, `nef` unless configured
//! otherwise) and by an exclusion set, normally the triage output folders so
//! a second run never re-processes files it already moved. The result is
//! sorted by case-insensitive path: every later stage depends on this order.
//!
//! ## Example
//! ```rust,ignore
//! use snapsort::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let photos = scanner.scan(Path::new("/Users/me/Pictures"))?.photos;
//! ```

mod filter;
mod walker;

pub use filter::{normalize_extensions, ImageFilter, DEFAULT_EXTENSIONS};
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Represents a discovered photo file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFile {
    /// Path to the photo file
    pub path: PathBuf,
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered photos in deterministic order
    pub photos: Vec<PhotoFile>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for photo scanners
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait PhotoScanner: Send + Sync {
    /// Scan a root directory and return discovered photos
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError>;
}
