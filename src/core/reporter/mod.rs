//! # Reporter Module
//!
//! Human-readable and CSV views of a triage run.
//!
//! ## Listings
//! 1. **Scanned**: files that were analyzed successfully
//! 2. **Ready**: planned moves with their reason
//! 3. **Metrics**: blur variance, face count and reason per file
//!
//! Plus the one-line run summary.

mod listing;

pub use listing::{write_metrics, write_ready, write_scanned};

use crate::events::PipelineSummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintFormat {
    #[default]
    Text,
    Csv,
}

impl FromStr for PrintFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(PrintFormat::Text),
            "csv" => Ok(PrintFormat::Csv),
            other => Err(format!("unknown print format: {}", other)),
        }
    }
}

impl fmt::Display for PrintFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintFormat::Text => write!(f, "text"),
            PrintFormat::Csv => write!(f, "csv"),
        }
    }
}

/// `Summary: scanned=.., blurred=.., partial=.., slight=.., duplicates=.. (groups=..), errors=..`
pub fn format_summary(summary: &PipelineSummary) -> String {
    format!(
        "Summary: scanned={}, blurred={}, partial={}, slight={}, duplicates={} (groups={}), errors={}",
        summary.scanned,
        summary.blurred,
        summary.partially_blurred,
        summary.slightly_blurred,
        summary.duplicates,
        summary.duplicate_groups,
        summary.errors
    )
}
