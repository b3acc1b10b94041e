//! # Quality Module
//!
//! Sharpness measurement using the variance of the Laplacian.
//!
//! The Laplacian operator responds to edges. A sharp image has many strong
//! edges and therefore a wide spread of Laplacian values; a blurred one has a
//! narrow spread. Low variance means blur.

use image::{imageops, GrayImage};

/// Axis-aligned pixel rectangle inside an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Clip the region to image bounds; `None` if nothing is left
    pub fn clamp_to(self, width: u32, height: u32) -> Option<Region> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        if w == 0 || h == 0 {
            return None;
        }
        Some(Region {
            x: self.x,
            y: self.y,
            width: w,
            height: h,
        })
    }
}

/// Computes Laplacian variance over whole images or regions
#[derive(Debug, Default, Clone, Copy)]
pub struct BlurMeter;

impl BlurMeter {
    /// Variance of the Laplacian over the full image
    pub fn variance(&self, gray: &GrayImage) -> f64 {
        laplacian_variance(gray)
    }

    /// Variance of the Laplacian over one region (e.g. a detected face)
    pub fn region_variance(&self, gray: &GrayImage, region: Region) -> f64 {
        match region.clamp_to(gray.width(), gray.height()) {
            Some(r) => {
                let crop = imageops::crop_imm(gray, r.x, r.y, r.width, r.height).to_image();
                laplacian_variance(&crop)
            }
            None => 0.0,
        }
    }
}

/// Laplacian kernel [0, 1, 0; 1, -4, 1; 0, 1, 0] over interior pixels.
fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();

    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut n = 0usize;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = gray.get_pixel(x, y)[0] as f64;
            let top = gray.get_pixel(x, y - 1)[0] as f64;
            let bottom = gray.get_pixel(x, y + 1)[0] as f64;
            let left = gray.get_pixel(x - 1, y)[0] as f64;
            let right = gray.get_pixel(x + 1, y)[0] as f64;

            let laplacian = top + bottom + left + right - 4.0 * center;
            sum += laplacian;
            sum_sq += laplacian * laplacian;
            n += 1;
        }
    }

    let n = n as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}
