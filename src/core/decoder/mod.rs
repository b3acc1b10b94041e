//! # Decoder Module
//!
//! Turns a file on disk into a pixel buffer.
//!
//! Two decoders sit behind the [`ImageDecoder`] trait and are chosen by file
//! extension:
//! - [`StandardDecoder`] - JPEG through zune-jpeg, everything else through the
//!   image crate
//! - [`RawDecoder`] - camera RAW through rawloader, reduced to luminance
//!
//! Both produce a `DynamicImage`, so hashing and blur measurement never need
//! to know which one ran.

mod raw;
mod standard;

pub use raw::RawDecoder;
pub use standard::StandardDecoder;

use crate::error::AnalyzeError;
use image::DynamicImage;
use std::path::Path;

/// Camera RAW extensions routed to [`RawDecoder`]
pub const RAW_EXTENSIONS: &[&str] = &[
    "nef", "cr2", "cr3", "arw", "dng", "raf", "orf", "rw2", "pef", "srw",
];

/// Something that can decode an image file into pixels
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DynamicImage, AnalyzeError>;
}

/// Which decoder handles a given path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    Standard,
    Raw,
}

impl DecoderKind {
    /// Select a decoder from the file extension (case-insensitive)
    pub fn for_path(path: &Path) -> Self {
        let is_raw = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| RAW_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);

        if is_raw {
            DecoderKind::Raw
        } else {
            DecoderKind::Standard
        }
    }

    fn decoder(self) -> &'static dyn ImageDecoder {
        match self {
            DecoderKind::Standard => &StandardDecoder,
            DecoderKind::Raw => &RawDecoder,
        }
    }
}

/// Decode a file with the decoder its extension selects.
pub fn decode(path: &Path) -> Result<DynamicImage, AnalyzeError> {
    let image = DecoderKind::for_path(path).decoder().decode(path)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(AnalyzeError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    Ok(image)
}
