//! File filtering logic for discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extensions accepted when none are configured: JPEG and Nikon RAW.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "nef"];

/// Normalize user-supplied extensions.
///
/// Trims whitespace, lowercases, strips a leading dot and drops empties and
/// repeats while keeping the first occurrence's position.
pub fn normalize_extensions<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .flat_map(|item| {
            item.as_ref()
                .split(',')
                .map(|part| part.trim().trim_start_matches('.').to_lowercase())
                .collect::<Vec<_>>()
        })
        .filter(|ext| !ext.is_empty())
        .filter(|ext| seen.insert(ext.clone()))
        .collect()
}

/// Decides whether a discovered path is a candidate photo
pub struct ImageFilter {
    /// Lowercase extensions without the dot
    extensions: HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
    /// Directories whose contents are never candidates
    excluded: Vec<PathBuf>,
}

impl ImageFilter {
    /// Create a new filter with the default extensions
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: true,
            excluded: Vec::new(),
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = normalize_extensions(extensions).into_iter().collect();
        self
    }

    /// Never accept anything at or below these directories
    pub fn with_excluded(mut self, dirs: Vec<PathBuf>) -> Self {
        self.excluded = dirs.into_iter().map(resolve_lenient).collect();
        self
    }

    /// Check whether a path lies inside one of the excluded directories
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        let resolved = resolve_lenient(path.to_path_buf());
        self.excluded.iter().any(|dir| resolved.starts_with(dir))
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        let accepted = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false);

        accepted && !self.is_excluded(path)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonicalize when the path exists, otherwise keep it as given.
fn resolve_lenient(path: PathBuf) -> PathBuf {
    path.canonicalize().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_default_extensions() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
        assert!(filter.should_include(Path::new("/photos/image.JPEG")));
        assert!(filter.should_include(Path::new("/photos/DSC_0001.NEF")));
    }

    #[test]
    fn filter_excludes_other_extensions() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/image.png")));
        assert!(!filter.should_include(Path::new("/photos/notes.txt")));
        assert!(!filter.should_include(Path::new("/photos/no_extension")));
    }

    #[test]
    fn custom_extensions_replace_defaults() {
        let filter = ImageFilter::new().with_extensions(vec![".PNG".into(), "tif".into()]);
        assert!(filter.should_include(Path::new("/photos/a.png")));
        assert!(filter.should_include(Path::new("/photos/a.TIF")));
        assert!(!filter.should_include(Path::new("/photos/a.jpg")));
    }

    #[test]
    fn hidden_files_included_unless_disabled() {
        assert!(ImageFilter::new().should_include(Path::new("/photos/.hidden.jpg")));
        assert!(!ImageFilter::new()
            .with_hidden(false)
            .should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn excluded_directories_are_skipped() {
        let filter = ImageFilter::new().with_excluded(vec![PathBuf::from("/photos/blurred")]);
        assert!(!filter.should_include(Path::new("/photos/blurred/a.jpg")));
        assert!(filter.should_include(Path::new("/photos/blurred_not/a.jpg")));
    }

    #[test]
    fn normalize_extensions_dedupes_and_lowercases() {
        let exts = normalize_extensions([".JPG, jpeg,.nef", "jpg", " "]);
        assert_eq!(exts, vec!["jpg", "jpeg", "nef"]);
    }
}
