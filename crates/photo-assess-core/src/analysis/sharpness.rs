//! Focus measurement.
//!
//! Sharpness is the variance of the 4-neighbour Laplacian response over the
//! grayscale image. The value is not normalized; consumers compare it with
//! fixed thresholds (blurry below 100, sharp above 500).

use image::GrayImage;

/// Default threshold below which an image is rated blurry.
pub const DEFAULT_BLURRY_THRESHOLD: f64 = 100.0;

/// Default threshold above which an image is rated sharp.
pub const DEFAULT_SHARP_THRESHOLD: f64 = 500.0;

/// Mirrors an out-of-range index back into `0..len` without repeating the
/// border sample (`dcb|abcd|cba`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn reflect_101(index: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    let mut i = index;
    if i < 0 {
        i = -i;
    }
    if i >= len {
        i = 2 * len - 2 - i;
    }
    i as u32
}

/// Variance of the Laplacian response. Zero for flat images.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    let count = u64::from(width) * u64::from(height);
    if count == 0 {
        return 0.0;
    }

    let w = i64::from(width);
    let h = i64::from(height);
    let at = |x: i64, y: i64| f64::from(gray.get_pixel(reflect_101(x, w), reflect_101(y, h)).0[0]);

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 0..h {
        for x in 0..w {
            let response =
                at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1) - 4.0 * at(x, y);
            sum += response;
            sum_sq += response * response;
        }
    }

    let n = count as f64;
    let mean = sum / n;
    // Guard against tiny negative values from cancellation
    (sum_sq / n - mean * mean).max(0.0)
}
