//! Aggregate image statistics
//!
//! Brightness is the arithmetic mean of every sampled channel intensity
//! (alpha excluded). Contrast is the population standard deviation of the
//! per-pixel luminance, so grayscale and color inputs are handled the same way.
//! Images with more than 8 bits per channel are scaled to 0-255 first.

use image::{DynamicImage, GrayImage, RgbImage};
use log::debug;
use solar_types::ImageStatistics;

/// ITU-R BT.601 luma weights
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Luminance of one RGB pixel on the 0-255 scale
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}

/// Compute width, height, brightness and contrast of a decoded image
pub fn extract_statistics(img: &DynamicImage) -> ImageStatistics {
    let (width, height) = (img.width(), img.height());

    let (brightness, contrast) = if img.color().has_color() {
        color_statistics(&img.to_rgb8())
    } else {
        gray_statistics(&img.to_luma8())
    };

    debug!(
        "image statistics: {}x{} brightness={:.2} contrast={:.2}",
        width, height, brightness, contrast
    );

    ImageStatistics::new(width, height, brightness, contrast)
}

fn gray_statistics(gray: &GrayImage) -> (f64, f64) {
    let values: &[u8] = gray.as_raw();
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let mean = mean_of(values.iter().map(|&v| v as f64), values.len());
    let std_dev = std_dev_of(values.iter().map(|&v| v as f64), mean, values.len());
    (mean, std_dev)
}

fn color_statistics(rgb: &RgbImage) -> (f64, f64) {
    let samples: &[u8] = rgb.as_raw();
    if samples.is_empty() {
        return (0.0, 0.0);
    }

    let brightness = mean_of(samples.iter().map(|&v| v as f64), samples.len());

    let pixel_count = samples.len() / 3;
    let luma = || rgb.pixels().map(|p| luminance(p[0], p[1], p[2]));
    let luma_mean = mean_of(luma(), pixel_count);
    let contrast = std_dev_of(luma(), luma_mean, pixel_count);

    (brightness, contrast)
}

fn mean_of(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    values.sum::<f64>() / count as f64
}

fn std_dev_of(values: impl Iterator<Item = f64>, mean: f64, count: usize) -> f64 {
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    variance.sqrt()
}
