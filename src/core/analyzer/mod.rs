//! # Analyzer Module
//!
//! Per-image feature extraction.
//!
//! Each discovered file becomes exactly one [`AnalysisRecord`]: either the
//! extracted [`Features`] (fingerprint, whole-image blur variance, per-face
//! variances) or an error message. Failed records take no further part in
//! clustering, classification or planning.

use crate::core::decoder;
use crate::core::faces::FaceHandle;
use crate::core::hasher::{ImageHashValue, PerceptualHasher};
use crate::core::quality::BlurMeter;
use crate::error::AnalyzeError;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Features extracted from one successfully decoded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    /// Perceptual fingerprint
    pub hash: ImageHashValue,
    /// Variance of the Laplacian over the whole image
    pub blur_variance: f64,
    /// One variance per detected face, in detection order.
    /// Empty when no face was found or face analysis was not requested.
    pub face_variances: Vec<f64>,
}

/// Success or failure of one extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisOutcome {
    Analyzed(Features),
    Failed(String),
}

/// One record per discovered file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub path: PathBuf,
    pub outcome: AnalysisOutcome,
}

impl AnalysisRecord {
    pub fn analyzed(path: impl Into<PathBuf>, features: Features) -> Self {
        Self {
            path: path.into(),
            outcome: AnalysisOutcome::Analyzed(features),
        }
    }

    pub fn failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            outcome: AnalysisOutcome::Failed(message.into()),
        }
    }

    pub fn features(&self) -> Option<&Features> {
        match &self.outcome {
            AnalysisOutcome::Analyzed(features) => Some(features),
            AnalysisOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Analyzed(_) => None,
            AnalysisOutcome::Failed(message) => Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.features().is_some()
    }

    /// Lowercase extension with a leading dot (`".jpg"`), empty if none
    pub fn extension(&self) -> String {
        dotted_extension(&self.path)
    }
}

/// Lowercase extension with a leading dot, used to group report listings
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Decodes an image and measures everything the classifier needs
pub struct FeatureExtractor {
    hasher: PerceptualHasher,
    meter: BlurMeter,
    detect_faces: bool,
}

impl FeatureExtractor {
    /// `detect_faces` should be true only for face-aware blur mode
    pub fn new(detect_faces: bool) -> Self {
        Self {
            hasher: PerceptualHasher::default(),
            meter: BlurMeter,
            detect_faces,
        }
    }

    /// Extract features, propagating anticipated failures
    pub fn extract(&self, path: &Path, faces: &mut FaceHandle) -> Result<Features, AnalyzeError> {
        let image = decoder::decode(path)?;
        let hash = self.hasher.hash_image(&image);
        let gray = image.to_luma8();
        let blur_variance = self.meter.variance(&gray);

        let face_variances = if self.detect_faces {
            faces
                .detect(&gray)
                .into_iter()
                .map(|region| self.meter.region_variance(&gray, region))
                .collect()
        } else {
            Vec::new()
        };

        Ok(Features {
            hash,
            blur_variance,
            face_variances,
        })
    }

    /// Analyze one file into a record. Never panics and never fails:
    /// decoder errors and unexpected faults both become error records.
    pub fn analyze(&self, path: &Path, faces: &mut FaceHandle) -> AnalysisRecord {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.extract(path, faces)));

        match result {
            Ok(Ok(features)) => {
                tracing::debug!(
                    path = %path.display(),
                    variance = features.blur_variance,
                    faces = features.face_variances.len(),
                    "analyzed"
                );
                AnalysisRecord::analyzed(path, features)
            }
            Ok(Err(e)) => AnalysisRecord::failed(path, e.to_string()),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                let error = AnalyzeError::WorkerFault {
                    path: path.to_path_buf(),
                    reason,
                };
                AnalysisRecord::failed(path, error.to_string())
            }
        }
    }
}
