//! Photometric enhancement transforms.
//!
//! Brightness, contrast, color and sharpness are enhancement-factor blends:
//! each output sample is `degenerate + factor * (input - degenerate)`,
//! rounded and clamped to `0..=255`, where the degenerate image is black,
//! flat mean gray, per-pixel grayscale and a smoothed copy respectively.
//! A factor of 1 reproduces the input; callers skip the transform instead.

use image::{Rgb, RgbImage};

use crate::analysis::{luma_of, to_gray, Histogram};

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(degenerate: u8, sample: u8, factor: f64) -> u8 {
    let deg = f64::from(degenerate);
    (deg + factor * (f64::from(sample) - deg)).round().clamp(0.0, 255.0) as u8
}

/// Scales every sample towards black (`factor < 1`) or away from it.
pub fn brightness(image: &mut RgbImage, factor: f64) {
    for pixel in image.pixels_mut() {
        for sample in &mut pixel.0 {
            *sample = blend(0, *sample, factor);
        }
    }
}

/// Pushes samples away from (or towards) the mean grayscale level.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn contrast(image: &mut RgbImage, factor: f64) {
    let mean = Histogram::from_luma(&to_gray(image)).mean().round().clamp(0.0, 255.0) as u8;
    for pixel in image.pixels_mut() {
        for sample in &mut pixel.0 {
            *sample = blend(mean, *sample, factor);
        }
    }
}

/// Saturates (or desaturates) each pixel relative to its own grayscale value.
pub fn color(image: &mut RgbImage, factor: f64) {
    for pixel in image.pixels_mut() {
        let luma = luma_of(pixel.0);
        for sample in &mut pixel.0 {
            *sample = blend(luma, *sample, factor);
        }
    }
}

/// Weights of the 3×3 smoothing kernel; the center dominates.
const SMOOTH_KERNEL: [[u32; 3]; 3] = [[1, 1, 1], [1, 5, 1], [1, 1, 1]];
const SMOOTH_WEIGHT: u32 = 13;

/// Smoothed copy used as the sharpness baseline. Border pixels are copied
/// unfiltered.
#[allow(clippy::cast_possible_truncation)]
fn smooth(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = image.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = [0u32; 3];
            for (ky, row) in SMOOTH_KERNEL.iter().enumerate() {
                for (kx, &weight) in row.iter().enumerate() {
                    let source = image.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                    for (total, &sample) in acc.iter_mut().zip(&source.0) {
                        *total += weight * u32::from(sample);
                    }
                }
            }
            // Rounded division; the maximum is 255, so the cast is lossless.
            let smoothed = acc.map(|total| ((total + SMOOTH_WEIGHT / 2) / SMOOTH_WEIGHT) as u8);
            out.put_pixel(x, y, Rgb(smoothed));
        }
    }
    out
}

/// Sharpens (`factor > 1`) or softens the image against a smoothed copy.
pub fn sharpness(image: &mut RgbImage, factor: f64) {
    let degenerate = smooth(image);
    for (pixel, base) in image.pixels_mut().zip(degenerate.pixels()) {
        for (sample, &deg) in pixel.0.iter_mut().zip(&base.0) {
            *sample = blend(deg, *sample, factor);
        }
    }
}

/// Shifts the color temperature with opposing red and blue gains.
///
/// A positive delta scales red by `1 + delta` and blue by `1 - delta / 2`;
/// a negative delta does the reverse with `|delta|`. Results are clamped
/// and truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn warmth(image: &mut RgbImage, delta: f64) {
    let magnitude = delta.abs();
    let (boost, cut) = if delta > 0.0 { (0, 2) } else { (2, 0) };
    let gain = 1.0 + magnitude;
    let loss = 1.0 - magnitude / 2.0;

    let scale = |sample: u8, by: f64| (f64::from(sample) * by).clamp(0.0, 255.0) as u8;
    for pixel in image.pixels_mut() {
        pixel.0[boost] = scale(pixel.0[boost], gain);
        pixel.0[cut] = scale(pixel.0[cut], loss);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(8, 8, Rgb(rgb))
    }

    fn mean_luma(image: &RgbImage) -> f64 {
        Histogram::from_luma(&to_gray(image)).mean()
    }

    #[test]
    fn test_blend_identity_and_clamp() {
        assert_eq!(blend(0, 200, 1.0), 200);
        assert_eq!(blend(0, 200, 2.0), 255);
        assert_eq!(blend(100, 0, 2.0), 0);
        assert_eq!(blend(0, 100, 1.5), 150);
    }

    #[test]
    fn test_brightness_scales_samples() {
        let mut image = uniform([128, 64, 10]);
        brightness(&mut image, 1.5);
        assert_eq!(image.get_pixel(0, 0).0, [192, 96, 15]);
    }

    #[test]
    fn test_brightness_raises_mid_gray() {
        let mut image = uniform([128, 128, 128]);
        brightness(&mut image, 1.0 + (1.0 - 128.0 / 255.0));
        assert!(mean_luma(&image) > 128.0);
    }

    #[test]
    fn test_contrast_spreads_around_mean() {
        let mut image = RgbImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgb([100, 100, 100])
            } else {
                Rgb([150, 150, 150])
            }
        });
        contrast(&mut image, 2.0);
        // Mean is 125: 100 -> 75, 150 -> 175
        assert_eq!(image.get_pixel(0, 0).0, [75, 75, 75]);
        assert_eq!(image.get_pixel(9, 0).0, [175, 175, 175]);
    }

    #[test]
    fn test_contrast_leaves_flat_image() {
        let mut image = uniform([90, 90, 90]);
        contrast(&mut image, 1.7);
        assert_eq!(image.get_pixel(3, 3).0, [90, 90, 90]);
    }

    #[test]
    fn test_color_zero_factor_is_grayscale() {
        let mut image = uniform([200, 100, 50]);
        color(&mut image, 0.0);
        let luma = luma_of([200, 100, 50]);
        assert_eq!(image.get_pixel(0, 0).0, [luma, luma, luma]);
    }

    #[test]
    fn test_color_keeps_gray_pixels() {
        let mut image = uniform([77, 77, 77]);
        color(&mut image, 1.3);
        assert_eq!(image.get_pixel(0, 0).0, [77, 77, 77]);
    }

    #[test]
    fn test_smooth_keeps_borders_and_flat_regions() {
        let image = RgbImage::from_fn(5, 5, |x, y| {
            if x == 2 && y == 2 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let smoothed = smooth(&image);
        // Center: 5 * 255 / 13 rounded
        assert_eq!(smoothed.get_pixel(2, 2).0, [98, 98, 98]);
        // Neighbour: 255 / 13 rounded
        assert_eq!(smoothed.get_pixel(1, 1).0, [20, 20, 20]);
        assert_eq!(smoothed.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_sharpness_increases_local_difference() {
        let mut image = RgbImage::from_fn(6, 6, |x, _| {
            if x < 3 {
                Rgb([80, 80, 80])
            } else {
                Rgb([160, 160, 160])
            }
        });
        sharpness(&mut image, 2.0);
        assert!(image.get_pixel(2, 2).0[0] < 80);
        assert!(image.get_pixel(3, 2).0[0] > 160);
    }

    #[test]
    fn test_warmth_positive() {
        let mut image = uniform([100, 100, 100]);
        warmth(&mut image, 0.2);
        assert_eq!(image.get_pixel(0, 0).0, [120, 100, 90]);
    }

    #[test]
    fn test_warmth_negative_mirrors() {
        let mut image = uniform([100, 100, 100]);
        warmth(&mut image, -0.2);
        assert_eq!(image.get_pixel(0, 0).0, [90, 100, 120]);
    }

    #[test]
    fn test_warmth_clamps() {
        let mut image = uniform([250, 0, 250]);
        warmth(&mut image, 0.5);
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 187]);
    }
}
