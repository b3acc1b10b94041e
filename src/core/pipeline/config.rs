//! Run configuration and its builder.

use super::executor::Pipeline;
use crate::core::classifier::{BlurClassifier, BlurMode, ClassificationPolicy};
use crate::core::faces::{DetectorFactory, FaceSource};
use crate::core::organize::{FolderNames, OperationMode};
use crate::core::scanner::{normalize_extensions, DEFAULT_EXTENSIONS};
use crate::error::SnapsortError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for one triage run
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Directory to triage
    pub input_dir: PathBuf,
    /// Base for the category folders (None = input dir)
    pub output_dir: Option<PathBuf>,
    /// Largest Hamming distance that still counts as a duplicate
    pub duplicate_threshold: u32,
    /// Laplacian variances strictly below this are blurred
    pub blur_threshold: f64,
    /// Share of blurred faces (0-100) for the partially blurred tier
    pub partial_blur_min_percent: f64,
    pub blur_mode: BlurMode,
    pub prefer_duplicate_over_blur: bool,
    pub folders: FolderNames,
    /// Lowercase extensions without the dot (empty = defaults)
    pub extensions: Vec<String>,
    pub recursive: bool,
    pub dry_run: bool,
    /// Copy instead of move
    pub keep_originals: bool,
    /// Analysis workers (None = rayon default)
    pub max_workers: Option<usize>,
    /// Where each worker gets its face detector
    pub faces: FaceSource,
    /// Extractions not started within this budget become errors
    pub deadline: Option<Duration>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: None,
            duplicate_threshold: 5,
            blur_threshold: 100.0,
            partial_blur_min_percent: 50.0,
            blur_mode: BlurMode::FaceAware,
            prefer_duplicate_over_blur: true,
            folders: FolderNames::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: true,
            dry_run: false,
            keep_originals: false,
            max_workers: None,
            faces: FaceSource::Disabled,
            deadline: None,
        }
    }
}

impl TriageConfig {
    /// Folder that holds the category folders
    pub fn base_output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.input_dir)
    }

    pub fn operation(&self) -> OperationMode {
        OperationMode::from_keep_originals(self.keep_originals)
    }

    pub fn policy(&self) -> ClassificationPolicy {
        ClassificationPolicy {
            blur: BlurClassifier::new(
                self.blur_mode,
                self.blur_threshold,
                self.partial_blur_min_percent,
            ),
            prefer_duplicate_over_blur: self.prefer_duplicate_over_blur,
        }
    }

    /// Face-aware blur without a detector: every image falls back to the
    /// whole-image rule, so the partial and slight tiers never occur
    pub fn faces_unavailable(&self) -> bool {
        self.blur_mode == BlurMode::FaceAware && matches!(self.faces, FaceSource::Disabled)
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<(), SnapsortError> {
        if !self.blur_threshold.is_finite() || self.blur_threshold < 0.0 {
            return Err(SnapsortError::Config(format!(
                "blur threshold must be a non-negative number, got {}",
                self.blur_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.partial_blur_min_percent) {
            return Err(SnapsortError::Config(format!(
                "partial blur percentage must be between 0 and 100, got {}",
                self.partial_blur_min_percent
            )));
        }
        if self.max_workers == Some(0) {
            return Err(SnapsortError::Config(
                "max workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: TriageConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: TriageConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: TriageConfig) -> Self {
        Self { config }
    }

    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn duplicate_threshold(mut self, threshold: u32) -> Self {
        self.config.duplicate_threshold = threshold;
        self
    }

    pub fn blur_threshold(mut self, threshold: f64) -> Self {
        self.config.blur_threshold = threshold;
        self
    }

    pub fn partial_blur_min_percent(mut self, percent: f64) -> Self {
        self.config.partial_blur_min_percent = percent;
        self
    }

    pub fn blur_mode(mut self, mode: BlurMode) -> Self {
        self.config.blur_mode = mode;
        self
    }

    pub fn prefer_duplicate_over_blur(mut self, prefer: bool) -> Self {
        self.config.prefer_duplicate_over_blur = prefer;
        self
    }

    pub fn folders(mut self, folders: FolderNames) -> Self {
        self.config.folders = folders;
        self
    }

    /// Accepts any spelling: `"JPG"`, `".jpg"`, `"jpg, nef"`.
    /// An empty list keeps the defaults.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = normalize_extensions(extensions);
        if !extensions.is_empty() {
            self.config.extensions = extensions;
        }
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    pub fn keep_originals(mut self, keep: bool) -> Self {
        self.config.keep_originals = keep;
        self
    }

    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.max_workers = Some(workers);
        self
    }

    /// Load the rustface model at `path` in each worker
    pub fn face_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.faces = FaceSource::SeetaModel(path.into());
        self
    }

    /// Use a custom detector; each worker calls the factory once
    pub fn face_detector(mut self, factory: DetectorFactory) -> Self {
        self.config.faces = FaceSource::Custom(factory);
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = Some(deadline);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline::new(self.config)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = TriageConfig::default();
        assert_eq!(config.duplicate_threshold, 5);
        assert_eq!(config.blur_threshold, 100.0);
        assert_eq!(config.partial_blur_min_percent, 50.0);
        assert_eq!(config.blur_mode, BlurMode::FaceAware);
        assert!(config.prefer_duplicate_over_blur);
        assert_eq!(config.extensions, vec!["jpg", "jpeg", "nef"]);
        assert_eq!(config.operation(), OperationMode::Move);
    }

    #[test]
    fn output_defaults_to_input() {
        let config = TriageConfig {
            input_dir: PathBuf::from("/photos"),
            ..Default::default()
        };
        assert_eq!(config.base_output_dir(), Path::new("/photos"));
    }

    #[test]
    fn builder_normalizes_extensions() {
        let config = PipelineBuilder::new()
            .extensions([".JPG", "png, jpg"])
            .build()
            .config()
            .clone();
        assert_eq!(config.extensions, vec!["jpg", "png"]);
    }

    #[test]
    fn empty_extension_list_keeps_defaults() {
        let config = PipelineBuilder::new()
            .extensions([""])
            .build()
            .config()
            .clone();
        assert_eq!(config.extensions, vec!["jpg", "jpeg", "nef"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn face_aware_without_detector_is_flagged() {
        assert!(TriageConfig::default().faces_unavailable());

        let whole_image = PipelineBuilder::new().blur_mode(BlurMode::WholeImage).build();
        assert!(!whole_image.config().faces_unavailable());

        let with_model = PipelineBuilder::new().face_model("/models/seeta.bin").build();
        assert!(!with_model.config().faces_unavailable());
    }

    #[test]
    fn validate_rejects_bad_percentages() {
        let config = TriageConfig {
            partial_blur_min_percent: 120.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SnapsortError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let config = TriageConfig {
            max_workers: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
