//! Blur tiering policy.

use super::types::{BlurMode, BlurTier};
use crate::core::analyzer::Features;

/// Assigns a [`BlurTier`] from measured variances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurClassifier {
    pub mode: BlurMode,
    /// Variances strictly below this are blurred
    pub threshold: f64,
    /// Percentage of blurred faces (0-100) that makes an image partially blurred
    pub partial_min_percent: f64,
}

impl Default for BlurClassifier {
    fn default() -> Self {
        Self {
            mode: BlurMode::FaceAware,
            threshold: 100.0,
            partial_min_percent: 50.0,
        }
    }
}

impl BlurClassifier {
    pub fn new(mode: BlurMode, threshold: f64, partial_min_percent: f64) -> Self {
        Self {
            mode,
            threshold,
            partial_min_percent,
        }
    }

    pub fn classify(&self, features: &Features) -> BlurTier {
        match self.mode {
            BlurMode::WholeImage => self.whole_image(features.blur_variance),
            BlurMode::FaceAware if features.face_variances.is_empty() => {
                let tier = self.whole_image(features.blur_variance);
                if tier == BlurTier::Blurred {
                    tracing::debug!(
                        "no faces; falling back to image blur: var={:.2}<thr={:.2}",
                        features.blur_variance,
                        self.threshold
                    );
                }
                tier
            }
            BlurMode::FaceAware => self.faces(&features.face_variances),
        }
    }

    fn whole_image(&self, variance: f64) -> BlurTier {
        if variance < self.threshold {
            BlurTier::Blurred
        } else {
            BlurTier::None
        }
    }

    fn faces(&self, variances: &[f64]) -> BlurTier {
        let face_count = variances.len();
        let blurred_faces = variances.iter().filter(|&&v| v < self.threshold).count();

        if blurred_faces == face_count {
            return BlurTier::Blurred;
        }

        let percent = blurred_faces as f64 / face_count as f64 * 100.0;
        if percent >= self.partial_min_percent {
            BlurTier::PartiallyBlurred
        } else if blurred_faces > 0 {
            BlurTier::SlightlyBlurred
        } else {
            BlurTier::None
        }
    }
}
