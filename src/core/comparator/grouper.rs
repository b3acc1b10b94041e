//! Greedy single-pass clustering against fixed canonical hashes.
//!
//! Records are visited in discovery order. Each one is compared only with the
//! canonical (first) hash of every existing group, never with other members.
//! It joins the nearest group if that distance is within the threshold, ties
//! going to the earliest group, and otherwise founds a new group. Membership
//! is frozen on admission, so the result depends on arrival order; this is
//! not transitive clustering.

use super::{Clustering, DuplicateGroup};
use crate::core::analyzer::AnalysisRecord;
use crate::core::hasher::PerceptualHash;
use std::collections::BTreeSet;

/// Groups analyzed records by distance to each group's canonical hash
#[derive(Debug, Clone, Copy)]
pub struct CanonicalGrouper {
    threshold: u32,
}

impl CanonicalGrouper {
    /// `threshold` is the largest Hamming distance that still counts as a duplicate
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Cluster records in slice order. Failed records are skipped.
    pub fn cluster(&self, records: &[AnalysisRecord]) -> Clustering {
        let mut groups: Vec<DuplicateGroup> = Vec::new();
        let mut duplicates = BTreeSet::new();

        for (index, record) in records.iter().enumerate() {
            let Some(features) = record.features() else {
                continue;
            };

            // Strict `<` keeps the earliest group on ties
            let mut nearest: Option<(usize, u32)> = None;
            for (group_index, group) in groups.iter().enumerate() {
                let distance = group.representative_hash.distance(&features.hash);
                if nearest.map_or(true, |(_, best)| distance < best) {
                    nearest = Some((group_index, distance));
                }
            }

            match nearest {
                Some((group_index, distance)) if distance <= self.threshold => {
                    groups[group_index].members.push(index);
                    duplicates.insert(index);
                    tracing::debug!(
                        path = %record.path.display(),
                        canonical = %groups[group_index].canonical_path.display(),
                        distance,
                        "duplicate"
                    );
                }
                _ => groups.push(DuplicateGroup {
                    representative_hash: features.hash.clone(),
                    canonical_path: record.path.clone(),
                    members: vec![index],
                }),
            }
        }

        Clustering { groups, duplicates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::Features;
    use crate::core::hasher::ImageHashValue;

    fn record(name: &str, hash: u64) -> AnalysisRecord {
        AnalysisRecord::analyzed(
            format!("/photos/{}", name),
            Features {
                hash: ImageHashValue::from_u64(hash),
                blur_variance: 500.0,
                face_variances: Vec::new(),
            },
        )
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let clustering = CanonicalGrouper::new(5).cluster(&[]);
        assert!(clustering.groups.is_empty());
        assert!(clustering.duplicates.is_empty());
    }

    #[test]
    fn all_close_images_form_one_group() {
        let records = vec![record("a.jpg", 0), record("b.jpg", 0b1), record("c.jpg", 0b11)];
        let clustering = CanonicalGrouper::new(5).cluster(&records);

        assert_eq!(clustering.groups.len(), 1);
        assert_eq!(clustering.groups[0].members, vec![0, 1, 2]);
        assert!(!clustering.is_duplicate(0));
        assert!(clustering.is_duplicate(1));
        assert!(clustering.is_duplicate(2));
    }

    #[test]
    fn threshold_is_inclusive() {
        // distance exactly 3
        let records = vec![record("a.jpg", 0), record("b.jpg", 0b111)];
        assert!(CanonicalGrouper::new(3).cluster(&records).is_duplicate(1));
        // distance 4 with threshold 3
        let records = vec![record("a.jpg", 0), record("b.jpg", 0b1111)];
        assert!(!CanonicalGrouper::new(3).cluster(&records).is_duplicate(1));
    }

    #[test]
    fn zero_threshold_only_matches_identical_hashes() {
        let records = vec![record("a.jpg", 7), record("b.jpg", 7), record("c.jpg", 6)];
        let clustering = CanonicalGrouper::new(0).cluster(&records);
        assert_eq!(clustering.groups.len(), 2);
        assert_eq!(clustering.duplicates.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn comparison_uses_canonical_hash_only() {
        // b is within 2 of a; c is within 2 of b but 4 away from a
        let records = vec![
            record("a.jpg", 0),
            record("b.jpg", 0b0011),
            record("c.jpg", 0b1111),
        ];
        let clustering = CanonicalGrouper::new(2).cluster(&records);

        assert_eq!(clustering.groups.len(), 2);
        assert_eq!(clustering.groups[0].members, vec![0, 1]);
        assert_eq!(clustering.groups[1].members, vec![2]);
        assert!(!clustering.is_duplicate(2));
    }

    #[test]
    fn ties_go_to_earliest_group() {
        let records = vec![
            record("a.jpg", 0b0000_0000),
            record("b.jpg", 0b1111_0000),
            // distance 2 from both canonicals
            record("c.jpg", 0b1100_0000),
        ];
        // a and b are 4 apart: separate groups with threshold 2
        let clustering = CanonicalGrouper::new(2).cluster(&records);

        assert_eq!(clustering.groups.len(), 2);
        assert_eq!(clustering.groups[0].members, vec![0, 2]);
    }

    #[test]
    fn nearest_group_wins_over_earlier_group() {
        let records = vec![
            record("a.jpg", 0b0000),
            record("b.jpg", 0b1111_1111),
            record("c.jpg", 0b0111_1111),
        ];
        let clustering = CanonicalGrouper::new(7).cluster(&records);

        assert_eq!(clustering.groups.len(), 2);
        assert_eq!(clustering.groups[1].members, vec![1, 2]);
    }

    #[test]
    fn canonical_member_is_never_a_duplicate() {
        let records = vec![record("a.jpg", 0), record("b.jpg", u64::MAX), record("c.jpg", 1)];
        let clustering = CanonicalGrouper::new(4).cluster(&records);

        for group in &clustering.groups {
            assert!(!clustering.is_duplicate(group.members[0]));
        }
        assert_eq!(clustering.duplicate_group_count(), 1);
    }

    #[test]
    fn failed_records_are_skipped() {
        let records = vec![
            AnalysisRecord::failed("/photos/bad.jpg", "decode failed"),
            record("a.jpg", 0),
            record("b.jpg", 0),
        ];
        let clustering = CanonicalGrouper::new(0).cluster(&records);

        assert_eq!(clustering.groups.len(), 1);
        assert_eq!(clustering.groups[0].members, vec![1, 2]);
        assert_eq!(clustering.groups[0].canonical_path, std::path::PathBuf::from("/photos/a.jpg"));
    }
}
