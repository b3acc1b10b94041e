//! # Faces Module
//!
//! Face detection as a pluggable capability.
//!
//! Detector instances are not safe to share between threads, so every worker
//! owns a private [`FaceHandle`] that builds its detector on first use from an
//! explicit [`FaceSource`]. Handles are never passed between workers.
//!
//! The bundled backend is rustface (SeetaFace frontal cascade). It needs a
//! model file; without one, face detection is unavailable and every image
//! reports zero faces, which makes face-aware blur classification fall back
//! to the whole-image variance.

use crate::core::quality::Region;
use crate::error::AnalyzeError;
use image::GrayImage;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Smallest face edge in pixels the detector looks for
const MIN_FACE_SIZE: u32 = 30;

/// Finds face rectangles in a grayscale image
pub trait FaceDetector {
    fn detect(&mut self, gray: &GrayImage) -> Vec<Region>;
}

/// Factory for custom detectors (tests, alternative backends)
pub type DetectorFactory = Arc<dyn Fn() -> Box<dyn FaceDetector> + Send + Sync>;

/// Where workers get their detector from
#[derive(Clone, Default)]
pub enum FaceSource {
    /// No detector: every image reports zero faces
    #[default]
    Disabled,
    /// SeetaFace model file loaded through rustface
    SeetaModel(PathBuf),
    /// Caller-supplied factory
    Custom(DetectorFactory),
}

impl fmt::Debug for FaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceSource::Disabled => write!(f, "Disabled"),
            FaceSource::SeetaModel(path) => write!(f, "SeetaModel({})", path.display()),
            FaceSource::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FaceSource {
    /// Build a fresh detector instance
    pub fn build(&self) -> Result<Option<Box<dyn FaceDetector>>, AnalyzeError> {
        match self {
            FaceSource::Disabled => Ok(None),
            FaceSource::SeetaModel(path) => Ok(Some(Box::new(SeetaFaceDetector::load(path)?))),
            FaceSource::Custom(factory) => Ok(Some(factory())),
        }
    }
}

/// rustface-backed detector
pub struct SeetaFaceDetector {
    inner: Box<dyn rustface::Detector>,
}

impl SeetaFaceDetector {
    /// Load the SeetaFace model at `path`
    pub fn load(path: &Path) -> Result<Self, AnalyzeError> {
        let unavailable = |reason: String| AnalyzeError::DetectorUnavailable {
            path: path.to_path_buf(),
            reason,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| unavailable("model path is not valid UTF-8".to_string()))?;

        let mut inner =
            rustface::create_detector(path_str).map_err(|e| unavailable(e.to_string()))?;
        inner.set_min_face_size(MIN_FACE_SIZE);
        inner.set_score_thresh(2.0);
        inner.set_pyramid_scale_factor(0.8);
        inner.set_slide_window_step(4, 4);

        Ok(Self { inner })
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&mut self, gray: &GrayImage) -> Vec<Region> {
        let mut data = rustface::ImageData::new(gray.as_raw(), gray.width(), gray.height());
        self.inner
            .detect(&mut data)
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                to_region(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect()
    }
}

/// Convert a possibly off-image bounding box into a non-negative region
fn to_region(x: i32, y: i32, width: u32, height: u32) -> Option<Region> {
    let x0 = x.max(0) as i64;
    let y0 = y.max(0) as i64;
    let x1 = x as i64 + width as i64;
    let y1 = y as i64 + height as i64;
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Region {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

enum HandleState {
    Unbuilt,
    Ready(Box<dyn FaceDetector>),
    Unavailable,
}

/// A worker's private, lazily-built detector
pub struct FaceHandle {
    source: FaceSource,
    state: HandleState,
}

impl FaceHandle {
    pub fn new(source: FaceSource) -> Self {
        Self {
            source,
            state: HandleState::Unbuilt,
        }
    }

    /// Detect faces, building the detector on first call.
    ///
    /// A detector that fails to load is reported once and then treated as
    /// finding no faces.
    pub fn detect(&mut self, gray: &GrayImage) -> Vec<Region> {
        if matches!(self.state, HandleState::Unbuilt) {
            self.state = match self.source.build() {
                Ok(Some(detector)) => HandleState::Ready(detector),
                Ok(None) => HandleState::Unavailable,
                Err(e) => {
                    tracing::warn!("{}; continuing without face detection", e);
                    HandleState::Unavailable
                }
            };
        }

        match &mut self.state {
            HandleState::Ready(detector) => detector.detect(gray),
            _ => Vec::new(),
        }
    }
}
