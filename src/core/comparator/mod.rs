//! # Comparator Module
//!
//! Finds near-duplicate photos by comparing perceptual hashes.
//!
//! ## How It Works
//! 1. Walk analyzed records in discovery order
//! 2. Compare each fingerprint with every group's canonical fingerprint
//! 3. Join the nearest group within the threshold, or start a new one
//!
//! ## Choosing a Threshold
//! | Distance | Typical meaning |
//! |----------|-----------------|
//! | 0        | Same picture    |
//! | 1-5      | Re-encode, resize, small edit |
//! | 6-10     | Burst shots, similar framing |
//! | 11+      | Different photos |

mod grouper;

pub use grouper::CanonicalGrouper;

use crate::core::hasher::ImageHashValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A cluster of visually similar photos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Hash of the canonical member, fixed when the group was created
    pub representative_hash: ImageHashValue,
    /// Path of the first member admitted
    pub canonical_path: PathBuf,
    /// Record indices in admission order; index 0 is the canonical member
    pub members: Vec<usize>,
}

impl DuplicateGroup {
    /// Number of members that will be routed as duplicates
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Whether this group actually contains duplicates
    pub fn has_duplicates(&self) -> bool {
        self.members.len() > 1
    }
}

/// Output of a clustering pass
#[derive(Debug, Clone, Default)]
pub struct Clustering {
    /// All groups, including singletons, in creation order
    pub groups: Vec<DuplicateGroup>,
    /// Record indices of every non-canonical member
    pub duplicates: BTreeSet<usize>,
}

impl Clustering {
    /// Whether the record at `index` was admitted as a non-canonical member
    pub fn is_duplicate(&self, index: usize) -> bool {
        self.duplicates.contains(&index)
    }

    /// Number of groups with more than one member
    pub fn duplicate_group_count(&self) -> usize {
        self.groups.iter().filter(|g| g.has_duplicates()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_group_has_no_duplicates() {
        let group = DuplicateGroup {
            representative_hash: ImageHashValue::from_u64(0),
            canonical_path: PathBuf::from("/a.jpg"),
            members: vec![0],
        };
        assert_eq!(group.duplicate_count(), 0);
        assert!(!group.has_duplicates());
    }
}
