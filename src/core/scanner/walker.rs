//! Directory walking implementation using walkdir.

use super::{filter::ImageFilter, PhotoFile, PhotoScanner, ScanResult};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files
    pub include_hidden: bool,
    /// Extensions to include (None = defaults)
    pub extensions: Option<Vec<String>>,
    /// Directories to leave out, typically the triage output folders
    pub exclude_dirs: Vec<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
            include_hidden: true,
            extensions: None,
            exclude_dirs: Vec::new(),
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new()
            .with_hidden(config.include_hidden)
            .with_excluded(config.exclude_dirs.clone());

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    fn walk(&self, root: &Path, events: &EventSender) -> (Vec<PhotoFile>, Vec<ScanError>) {
        let mut photos = Vec::new();
        let mut errors = Vec::new();

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        // Prune excluded folders instead of walking through them
        let entries = walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.filter.is_excluded(entry.path()));

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let error = if e.io_error().map(|io| io.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
                        }
                    };
                    tracing::warn!("{}", error);
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                    continue;
                }
            };

            if !entry.file_type().is_file() && !entry.path().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.filter.should_include(path) {
                continue;
            }

            photos.push(PhotoFile {
                path: path.to_path_buf(),
            });
        }

        (photos, errors)
    }
}

impl PhotoScanner for WalkDirScanner {
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &crate::events::null_sender())
    }

    fn scan_with_events(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let (mut photos, errors) = self.walk(root, events);

        // Deterministic order: case-insensitive full path
        photos.sort_by_cached_key(|photo| photo.path.to_string_lossy().to_lowercase());

        events.send(Event::Scan(ScanEvent::Completed {
            total_photos: photos.len(),
        }));

        Ok(ScanResult { photos, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_photo(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.photos.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_orders_paths_case_insensitively() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "b.jpg");
        create_test_photo(temp_dir.path(), "A.jpg");
        create_test_photo(temp_dir.path(), "c.JPEG");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        let names: Vec<_> = result
            .photos
            .iter()
            .map(|p| p.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.jpg", "b.jpg", "c.JPEG"]);
    }

    #[test]
    fn scan_excludes_non_image_files() {
        let temp_dir = TempDir::new().unwrap();
        create_test_photo(temp_dir.path(), "photo.jpg");
        File::create(temp_dir.path().join("document.txt")).unwrap();
        File::create(temp_dir.path().join("picture.png")).unwrap();

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.photos.len(), 1);
        assert!(result.photos[0].path.ends_with("photo.jpg"));
    }

    #[test]
    fn non_recursive_scan_ignores_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        create_test_photo(temp_dir.path(), "root.jpg");
        create_test_photo(&subdir, "nested.jpg");

        let flat = WalkDirScanner::new(ScanConfig {
            recursive: false,
            ..Default::default()
        });
        assert_eq!(flat.scan(temp_dir.path()).unwrap().photos.len(), 1);

        let deep = WalkDirScanner::new(ScanConfig::default());
        assert_eq!(deep.scan(temp_dir.path()).unwrap().photos.len(), 2);
    }

    #[test]
    fn scan_skips_excluded_output_folders() {
        let temp_dir = TempDir::new().unwrap();
        let blurred = temp_dir.path().join("blurred");
        fs::create_dir(&blurred).unwrap();
        create_test_photo(temp_dir.path(), "keep.jpg");
        create_test_photo(&blurred, "already_sorted.jpg");

        let scanner = WalkDirScanner::new(ScanConfig {
            exclude_dirs: vec![blurred],
            ..Default::default()
        });
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.photos.len(), 1);
        assert!(result.photos[0].path.ends_with("keep.jpg"));
    }

    #[test]
    fn scan_nonexistent_directory_returns_error() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/path/12345"));
        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
