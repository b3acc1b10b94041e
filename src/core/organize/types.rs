//! Types for the organize module.

use crate::core::classifier::Disposition;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Folder name for each routed disposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNames {
    pub blurred: String,
    pub partially_blurred: String,
    pub slightly_blurred: String,
    pub duplicate: String,
}

impl Default for FolderNames {
    fn default() -> Self {
        Self {
            blurred: "blurred".to_string(),
            partially_blurred: "partialBlurred".to_string(),
            slightly_blurred: "slightlyBlurred".to_string(),
            duplicate: "duplicate".to_string(),
        }
    }
}

impl FolderNames {
    /// Folder for a disposition; `None` for [`Disposition::Keep`]
    pub fn name_for(&self, disposition: Disposition) -> Option<&str> {
        match disposition {
            Disposition::Keep => None,
            Disposition::Duplicate => Some(&self.duplicate),
            Disposition::Blurred => Some(&self.blurred),
            Disposition::PartiallyBlurred => Some(&self.partially_blurred),
            Disposition::SlightlyBlurred => Some(&self.slightly_blurred),
        }
    }
}

/// Fixed mapping from disposition to destination directory for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    base: PathBuf,
    folders: FolderNames,
}

impl Destinations {
    pub fn new(base: impl Into<PathBuf>, folders: FolderNames) -> Self {
        Self {
            base: base.into(),
            folders,
        }
    }

    pub fn dir_for(&self, disposition: Disposition) -> Option<PathBuf> {
        self.folders
            .name_for(disposition)
            .map(|name| self.base.join(name))
    }

    /// Every destination directory, in [`Disposition::ROUTED`] order
    pub fn all_dirs(&self) -> Vec<PathBuf> {
        Disposition::ROUTED
            .iter()
            .filter_map(|&d| self.dir_for(d))
            .collect()
    }
}

/// Operation mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// Copy files to destination (keep originals)
    Copy,
    /// Move files to destination
    #[default]
    Move,
}

impl OperationMode {
    pub fn from_keep_originals(keep_originals: bool) -> Self {
        if keep_originals {
            OperationMode::Copy
        } else {
            OperationMode::Move
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            OperationMode::Copy => "copy",
            OperationMode::Move => "move",
        }
    }
}

/// One planned relocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePlan {
    pub source: PathBuf,
    /// `destination dir / source file name`, before collision handling
    pub destination: PathBuf,
    pub disposition: Disposition,
}

impl MovePlan {
    pub fn destination_dir(&self) -> &Path {
        self.destination.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn reason(&self) -> &'static str {
        self.disposition.reason()
    }
}

/// A plan entry that was carried out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedMove {
    pub source: PathBuf,
    /// Final path, after collision renaming
    pub destination: PathBuf,
    pub disposition: Disposition,
}

/// A plan entry that could not be carried out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedMove {
    pub source: PathBuf,
    pub message: String,
}

/// Result of executing the plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub completed: Vec<CompletedMove>,
    pub failed: Vec<FailedMove>,
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Successful executions with the given disposition
    pub fn count(&self, disposition: Disposition) -> usize {
        self.completed
            .iter()
            .filter(|m| m.disposition == disposition)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_has_no_destination() {
        let destinations = Destinations::new("/out", FolderNames::default());
        assert_eq!(destinations.dir_for(Disposition::Keep), None);
        assert_eq!(
            destinations.dir_for(Disposition::PartiallyBlurred),
            Some(PathBuf::from("/out/partialBlurred"))
        );
        assert_eq!(destinations.all_dirs().len(), 4);
    }

    #[test]
    fn keep_originals_selects_copy() {
        assert_eq!(OperationMode::from_keep_originals(true), OperationMode::Copy);
        assert_eq!(OperationMode::from_keep_originals(false).verb(), "move");
    }
}
