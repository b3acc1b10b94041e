//! Camera RAW decoding via rawloader.
//!
//! RAW files hold undemosaiced sensor data. Hashing and blur measurement only
//! need luminance, so each 2x2 Bayer block is averaged into one gray pixel
//! instead of running a full demosaic. The output is half resolution for
//! mosaic sensors and full resolution for already-interpolated data
//! (linear DNG).

use super::ImageDecoder;
use crate::error::AnalyzeError;
use image::{DynamicImage, GrayImage};
use rawloader::RawImageData;
use std::path::Path;

/// Decoder for NEF, CR2, ARW, DNG and other camera RAW formats
#[derive(Debug, Default, Clone, Copy)]
pub struct RawDecoder;

impl ImageDecoder for RawDecoder {
    fn decode(&self, path: &Path) -> Result<DynamicImage, AnalyzeError> {
        let raw = rawloader::decode_file(path).map_err(|e| AnalyzeError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("rawloader decode failed: {:?}", e),
        })?;

        let (width, height, cpp) = (raw.width, raw.height, raw.cpp.max(1));
        let black = raw.blacklevels[0] as f32;
        let white = raw.whitelevels[0] as f32;
        let range = (white - black).max(1.0);

        let samples: Vec<f32> = match &raw.data {
            RawImageData::Integer(data) => data
                .iter()
                .map(|&v| ((v as f32 - black) / range).clamp(0.0, 1.0))
                .collect(),
            RawImageData::Float(data) => data.iter().map(|&v| v.clamp(0.0, 1.0)).collect(),
        };

        let gray = if cpp == 1 {
            bin_bayer(&samples, width, height)
        } else {
            average_channels(&samples, width, height, cpp)
        };

        gray.map(DynamicImage::ImageLuma8)
            .ok_or_else(|| AnalyzeError::EmptyImage {
                path: path.to_path_buf(),
            })
    }
}

/// Average each 2x2 CFA block into a single 8-bit luminance value
fn bin_bayer(samples: &[f32], width: usize, height: usize) -> Option<GrayImage> {
    let (out_w, out_h) = (width / 2, height / 2);
    if out_w == 0 || out_h == 0 || samples.len() < width * height {
        return None;
    }

    let mut pixels = Vec::with_capacity(out_w * out_h);
    for y in 0..out_h {
        let top = 2 * y * width;
        let bottom = top + width;
        for x in 0..out_w {
            let col = 2 * x;
            let sum = samples[top + col]
                + samples[top + col + 1]
                + samples[bottom + col]
                + samples[bottom + col + 1];
            pixels.push(to_u8(sum / 4.0));
        }
    }

    GrayImage::from_raw(out_w as u32, out_h as u32, pixels)
}

/// Average the first three components of interleaved multi-channel data
fn average_channels(samples: &[f32], width: usize, height: usize, cpp: usize) -> Option<GrayImage> {
    if width == 0 || height == 0 || samples.len() < width * height * cpp {
        return None;
    }

    let used = cpp.min(3);
    let pixels = samples
        .chunks_exact(cpp)
        .take(width * height)
        .map(|px| to_u8(px[..used].iter().sum::<f32>() / used as f32))
        .collect();

    GrayImage::from_raw(width as u32, height as u32, pixels)
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bayer_blocks_are_averaged() {
        // 4x2 mosaic -> 2x1 output
        let samples = vec![
            1.0, 1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, 0.0,
        ];
        let gray = bin_bayer(&samples, 4, 2).unwrap();
        assert_eq!(gray.dimensions(), (2, 1));
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
        assert_eq!(gray.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn too_small_mosaic_is_rejected() {
        assert!(bin_bayer(&[0.5], 1, 1).is_none());
    }

    #[test]
    fn rgb_data_is_averaged_per_pixel() {
        let samples = vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let gray = average_channels(&samples, 2, 1, 3).unwrap();
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
        assert_eq!(gray.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn non_raw_file_is_a_decode_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fake.nef");
        std::fs::write(&path, b"not a raw file").unwrap();

        let result = RawDecoder.decode(&path);
        assert!(matches!(result, Err(AnalyzeError::DecodeError { .. })));
    }
}
