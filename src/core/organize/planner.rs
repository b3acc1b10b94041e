//! Plan generator for triage moves.

use super::types::{Destinations, MovePlan};
use crate::core::classifier::Disposition;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Turns dispositions into move plans without touching the filesystem
#[derive(Debug, Clone)]
pub struct MovePlanner {
    destinations: Destinations,
}

impl MovePlanner {
    pub fn new(destinations: Destinations) -> Self {
        Self { destinations }
    }

    /// Plan every non-keep entry, preserving input order
    pub fn plan<'a, I>(&self, items: I) -> Vec<MovePlan>
    where
        I: IntoIterator<Item = (&'a Path, Disposition)>,
    {
        items
            .into_iter()
            .filter_map(|(source, disposition)| {
                let dir = self.destinations.dir_for(disposition)?;
                let Some(name) = source.file_name() else {
                    tracing::warn!(path = %source.display(), "skipping file without a name");
                    return None;
                };
                Some(MovePlan {
                    source: source.to_path_buf(),
                    destination: dir.join(name),
                    disposition,
                })
            })
            .collect()
    }

    /// Collision-free destinations as they would be chosen if `plans` ran in
    /// order against the current filesystem. Read-only.
    pub fn preview_destinations(plans: &[MovePlan]) -> Vec<PathBuf> {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        plans
            .iter()
            .map(|plan| {
                let path = unique_destination(&plan.destination, |candidate| {
                    claimed.contains(candidate) || candidate.exists()
                });
                claimed.insert(path.clone());
                path
            })
            .collect()
    }
}

/// First of `dir/stem.ext`, `dir/stem_1.ext`, `dir/stem_2.ext`, ... for which
/// `taken` is false
pub fn unique_destination<F>(destination: &Path, taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !taken(destination) {
        return destination.to_path_buf();
    }

    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = destination.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = destination.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1u64;
    loop {
        let name = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = parent.join(name);
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
