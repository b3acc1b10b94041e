//! # Hasher Module
//!
//! Computes the perceptual fingerprints used for duplicate clustering.
//!
//! ## How It Works
//! 1. Downscale and convert to grayscale
//! 2. Take a DCT and keep the low-frequency 8x8 block
//! 3. Set a bit for every coefficient above the mean
//! 4. Compare fingerprints using Hamming distance

mod perceptual;
mod traits;

pub use perceptual::PerceptualHasher;
pub use traits::{ImageHashValue, PerceptualHash};
