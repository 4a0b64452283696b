//! Content-aware rule-of-thirds crop.
//!
//! The subject is taken to be the outer edge contour enclosing the largest
//! area. The crop window is shifted so that the subject's center moves
//! towards the opposite thirds intersection, while keeping most of the frame.

use image::RgbImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;
use tracing::debug;

use crate::analysis::{detect_edges, to_gray};
use crate::domain::{BoundingBox, ImageDimensions};

/// Smallest fraction of either dimension a crop may keep.
pub const MIN_KEEP_FRACTION: f64 = 0.8;

/// Crop window in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Window width, never zero.
    pub width: u32,
    /// Window height, never zero.
    pub height: u32,
}

impl CropWindow {
    /// Cuts the window out of `image` into a new buffer.
    #[must_use]
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        image::imageops::crop_imm(image, self.x, self.y, self.width, self.height).to_image()
    }
}

/// Parameters of the crop solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropParams {
    /// Canny low threshold.
    pub canny_low: f32,
    /// Canny high threshold.
    pub canny_high: f32,
    /// Fraction of each dimension the window keeps, clamped to
    /// `[MIN_KEEP_FRACTION, 1]`.
    pub keep_fraction: f64,
}

/// Twice the signed polygon area (shoelace formula), as an absolute value.
fn doubled_area(points: &[Point<i32>]) -> i64 {
    if points.len() < 3 {
        return 0;
    }
    let mut sum = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        sum += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
    }
    sum.abs()
}

/// Outermost outer border with the largest enclosed area; ties keep the
/// first one found.
fn largest_outer_contour(contours: &[Contour<i32>]) -> Option<&Contour<i32>> {
    let mut best: Option<(&Contour<i32>, i64)> = None;
    for contour in contours
        .iter()
        .filter(|c| c.parent.is_none() && matches!(c.border_type, BorderType::Outer))
    {
        let area = doubled_area(&contour.points);
        if best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((contour, area));
        }
    }
    best.map(|(contour, _)| contour)
}

#[allow(clippy::cast_sign_loss)]
fn bounding_box(points: &[Point<i32>]) -> Option<BoundingBox> {
    let min_x = points.iter().map(|p| p.x).min()?;
    let max_x = points.iter().map(|p| p.x).max()?;
    let min_y = points.iter().map(|p| p.y).min()?;
    let max_y = points.iter().map(|p| p.y).max()?;
    Some(BoundingBox::new(
        min_x.max(0) as u32,
        min_y.max(0) as u32,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}

/// Window size along one axis: at least `keep_fraction` of the dimension
/// (never below [`MIN_KEEP_FRACTION`]), at least one pixel, never more than
/// the dimension.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn window_size(dimension: u32, keep_fraction: f64) -> u32 {
    let keep_fraction = if keep_fraction.is_nan() {
        MIN_KEEP_FRACTION
    } else {
        keep_fraction.clamp(MIN_KEEP_FRACTION, 1.0)
    };
    let size = (f64::from(dimension) * keep_fraction - 1e-9).ceil();
    (size.max(1.0) as u32).min(dimension)
}

/// Window origin along one axis for a subject centered at `center`.
fn window_origin(center: u32, dimension: u32, size: u32) -> u32 {
    let target = if center > dimension / 2 {
        dimension / 3
    } else {
        dimension * 2 / 3
    };
    let offset = i64::from(center) - i64::from(target);
    let max_origin = i64::from(dimension - size);
    // Bounded by `dimension - size`, which fits in u32.
    u32::try_from(offset.clamp(0, max_origin)).unwrap_or(0)
}

/// Finds the crop window for `image`, or `None` when no subject contour is
/// found.
#[must_use]
pub fn solve_crop(image: &RgbImage, params: &CropParams) -> Option<CropWindow> {
    let (width, height) = image.dimensions();
    if ImageDimensions::new(width, height).is_empty() {
        return None;
    }

    let edges = detect_edges(&to_gray(image), params.canny_low, params.canny_high);
    let contours = find_contours::<i32>(&edges);
    let Some(subject) = largest_outer_contour(&contours) else {
        debug!("No contours found, keeping full frame");
        return None;
    };
    let subject = bounding_box(&subject.points)?;
    let (center_x, center_y) = subject.center();

    let crop_width = window_size(width, params.keep_fraction);
    let crop_height = window_size(height, params.keep_fraction);
    let window = CropWindow {
        x: window_origin(center_x, width, crop_width),
        y: window_origin(center_y, height, crop_height),
        width: crop_width,
        height: crop_height,
    };
    debug!(?subject, ?window, "Solved rule-of-thirds crop");
    Some(window)
}
