//! Annotated rendering of an analysis.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use super::composition::thirds_points;
use super::glyphs::{draw_text, text_height};
use crate::domain::{AnalysisResult, BoundingBox};

const GRID_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const POINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const FACE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_SHADOW: Rgb<u8> = Rgb([0, 0, 0]);

const POINT_RADIUS: i32 = 5;
const TEXT_SCALE: u32 = 2;
const TEXT_LEFT: i32 = 10;
/// Baselines of the three metric lines.
const TEXT_BASELINES: [i32; 3] = [30, 60, 90];

/// Draws the thirds grid, intersections, faces and metric labels onto a
/// copy of `image`.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
#[must_use]
pub fn render(image: &RgbImage, result: &AnalysisResult, faces: &[BoundingBox]) -> RgbImage {
    let mut canvas = image.clone();
    let (width, height) = canvas.dimensions();
    let (w, h) = (width as f32, height as f32);
    let (w3, h3) = ((width / 3) as f32, (height / 3) as f32);

    draw_line_segment_mut(&mut canvas, (0.0, h3), (w, h3), GRID_COLOR);
    draw_line_segment_mut(&mut canvas, (0.0, h3 * 2.0), (w, h3 * 2.0), GRID_COLOR);
    draw_line_segment_mut(&mut canvas, (w3, 0.0), (w3, h), GRID_COLOR);
    draw_line_segment_mut(&mut canvas, (w3 * 2.0, 0.0), (w3 * 2.0, h), GRID_COLOR);

    for (x, y) in thirds_points(width, height) {
        draw_filled_circle_mut(&mut canvas, (x as i32, y as i32), POINT_RADIUS, POINT_COLOR);
    }

    for face in faces {
        draw_face(&mut canvas, face);
    }

    let labels = [
        format!("Brightness: {:.1}", result.brightness),
        format!("Contrast: {:.2}", result.contrast),
        format!("Sharpness: {:.0}", result.sharpness),
    ];
    for (label, baseline) in labels.iter().zip(TEXT_BASELINES) {
        let top = baseline - text_height(TEXT_SCALE) as i32;
        draw_text(&mut canvas, label, TEXT_LEFT + 1, top + 1, TEXT_SCALE, TEXT_SHADOW);
        draw_text(&mut canvas, label, TEXT_LEFT, top, TEXT_SCALE, TEXT_COLOR);
    }

    canvas
}

/// Two-pixel rectangle outline.
#[allow(clippy::cast_possible_wrap)]
fn draw_face(canvas: &mut RgbImage, face: &BoundingBox) {
    if face.width == 0 || face.height == 0 {
        return;
    }
    let (x, y) = (face.x as i32, face.y as i32);
    draw_hollow_rect_mut(canvas, Rect::at(x, y).of_size(face.width, face.height), FACE_COLOR);
    if face.width > 2 && face.height > 2 {
        let inner = Rect::at(x + 1, y + 1).of_size(face.width - 2, face.height - 2);
        draw_hollow_rect_mut(canvas, inner, FACE_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelStats, ColorBalance, ImageDimensions};

    fn result_for(width: u32, height: u32) -> AnalysisResult {
        let channel = ChannelStats {
            average: 0.0,
            balance: 1.0,
            variance: 0.0,
        };
        AnalysisResult {
            dimensions: ImageDimensions::new(width, height),
            aspect_ratio: f64::from(width) / f64::from(height),
            brightness: 0.0,
            contrast: 0.0,
            rule_of_thirds: 0.0,
            sharpness: 0.0,
            color_balance: ColorBalance {
                red: channel,
                green: channel,
                blue: channel,
            },
            face_count: 0,
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let image = RgbImage::new(120, 90);
        let rendered = render(&image, &result_for(120, 90), &[]);
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0]));
        assert_eq!(rendered.dimensions(), (120, 90));
    }

    #[test]
    fn test_grid_and_points_are_drawn() {
        let image = RgbImage::new(120, 90);
        let rendered = render(&image, &result_for(120, 90), &[]);
        // Vertical grid line at x = 40, far from the labels
        assert_eq!(*rendered.get_pixel(40, 85), GRID_COLOR);
        // Intersection dot at (80, 60)
        assert_eq!(*rendered.get_pixel(80, 60), POINT_COLOR);
    }

    #[test]
    fn test_faces_are_outlined() {
        let image = RgbImage::new(120, 90);
        let face = BoundingBox::new(90, 70, 20, 15);
        let rendered = render(&image, &result_for(120, 90), &[face]);
        assert_eq!(*rendered.get_pixel(90, 75), FACE_COLOR);
        assert_eq!(*rendered.get_pixel(91, 75), FACE_COLOR);
        assert_eq!(*rendered.get_pixel(100, 77), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_labels_are_drawn() {
        let image = RgbImage::new(300, 120);
        let rendered = render(&image, &result_for(300, 120), &[]);
        let label_area_has_text = (10..60)
            .flat_map(|x| (16..30).map(move |y| (x, y)))
            .any(|(x, y)| *rendered.get_pixel(x, y) == TEXT_COLOR);
        assert!(label_area_has_text);
    }

    #[test]
    fn test_tiny_image_does_not_panic() {
        let image = RgbImage::new(2, 2);
        let face = BoundingBox::new(0, 0, 1, 1);
        let _ = render(&image, &result_for(2, 2), &[face]);
    }
}
