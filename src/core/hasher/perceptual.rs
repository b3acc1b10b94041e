//! Perceptual Hash (pHash) implementation.
//!
//! pHash takes the low-frequency corner of a DCT of the downscaled image and
//! sets one bit per coefficient above the mean. It tolerates:
//! - Scaling
//! - Brightness/contrast changes
//! - Compression artifacts
//!
//! The image_hasher crate provides the DCT and the bit packing.

use super::traits::ImageHashValue;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig};

/// Computes 64-bit (8x8) perceptual hashes by default
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    /// Create a pHash hasher producing `hash_size * hash_size` bits
    pub fn new(hash_size: u32) -> Self {
        let hasher = HasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }

    /// Hash an already-decoded image
    pub fn hash_image(&self, image: &DynamicImage) -> ImageHashValue {
        ImageHashValue::from_bytes(self.hasher.hash_image(image).as_bytes())
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new(8)
    }
}
