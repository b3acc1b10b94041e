//! # Classifier Module
//!
//! Turns measured features into a routing decision.
//!
//! ## Blur Tiers
//! - **Whole image**: blurred when the frame's Laplacian variance is below the threshold
//! - **Face aware**: tiers by the share of blurred faces
//!   - every face blurred → blurred
//!   - share at or above the partial minimum → partially blurred
//!   - at least one blurred face → slightly blurred
//!   - no faces found → whole-image rule, which can only yield blurred
//!
//! ## Resolution
//! A duplicate verdict and a blur tier are folded into a single
//! [`Disposition`] by [`resolve`].

mod blur;
mod resolver;
mod types;

pub use blur::BlurClassifier;
pub use resolver::resolve;
pub use types::{BlurMode, BlurTier, Disposition};

use crate::core::analyzer::Features;

/// Blur policy plus duplicate precedence, applied once per image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationPolicy {
    pub blur: BlurClassifier,
    pub prefer_duplicate_over_blur: bool,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            blur: BlurClassifier::default(),
            prefer_duplicate_over_blur: true,
        }
    }
}

impl ClassificationPolicy {
    pub fn disposition(&self, features: &Features, is_duplicate: bool) -> Disposition {
        let tier = self.blur.classify(features);
        resolve(is_duplicate, tier, self.prefer_duplicate_over_blur)
    }
}
