//! Rule-of-thirds composition scoring.
//!
//! Edge pixels are counted in square regions around the four thirds
//! intersections and compared with the share a uniform edge distribution
//! would put there.

use image::GrayImage;
use imageproc::edges::canny;

/// The four thirds intersections `(x, y)`, using integer thirds.
#[must_use]
pub const fn thirds_points(width: u32, height: u32) -> [(u32, u32); 4] {
    let (w3, h3) = (width / 3, height / 3);
    [(w3, h3), (w3 * 2, h3), (w3, h3 * 2), (w3 * 2, h3 * 2)]
}

/// Runs Canny edge detection; edge pixels are non-zero.
#[must_use]
pub fn detect_edges(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    canny(gray, low, high)
}

/// Number of non-zero pixels in `[x0, x1) × [y0, y1)`.
fn count_edges(edges: &GrayImage, x0: u32, x1: u32, y0: u32, y1: u32) -> u64 {
    let mut count = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            if edges.get_pixel(x, y).0[0] > 0 {
                count += 1;
            }
        }
    }
    count
}

/// Scores how strongly edges gather around the thirds intersections.
///
/// Each region is a square of half-side `min(w, h) / region_divisor`
/// clipped to the image. Returns 0 when there are no edges or the regions
/// are empty, otherwise a value in `[0, 1]`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn rule_of_thirds_score(edges: &GrayImage, region_divisor: u32) -> f64 {
    let (width, height) = edges.dimensions();
    let total_edges = count_edges(edges, 0, width, 0, height);
    if total_edges == 0 {
        return 0.0;
    }

    let half = width.min(height) / region_divisor.max(1);
    if half == 0 {
        return 0.0;
    }

    let intersection_edges: u64 = thirds_points(width, height)
        .iter()
        .map(|&(x, y)| {
            count_edges(
                edges,
                x.saturating_sub(half),
                (x + half).min(width),
                y.saturating_sub(half),
                (y + half).min(height),
            )
        })
        .sum();

    let side = u64::from(half) * 2;
    let region_pixels = 4 * side * side;
    let total_pixels = u64::from(width) * u64::from(height);

    let expected_random_proportion = region_pixels as f64 / total_pixels as f64;
    let actual_proportion = intersection_edges as f64 / total_edges as f64;

    (actual_proportion / (expected_random_proportion * 2.0)).min(1.0)
}
