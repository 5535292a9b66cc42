use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::annotate::{Annotator, Color};
use crate::models::{BoundingBox, KeyPoints};

/// Outlines the box of every detection.
#[derive(Debug, Clone)]
pub struct BoxAnnotator {
    pub color: Color,
    pub thickness: u32,
}

impl BoxAnnotator {
    pub fn new(color: Color, thickness: u32) -> Self {
        Self { color, thickness }
    }
}

impl Default for BoxAnnotator {
    fn default() -> Self {
        Self::new(Color::GREEN, 2)
    }
}

impl Annotator for BoxAnnotator {
    fn annotate(&self, scene: &mut RgbImage, key_points: &KeyPoints) {
        let color: Rgb<u8> = self.color.into();
        for bbox in &key_points.boxes {
            draw_outline(scene, bbox, self.thickness, color);
        }
    }

    fn name(&self) -> &str {
        "Box Annotator"
    }
}

/// Nested one-pixel rectangles growing inwards from the box edge.
fn draw_outline(scene: &mut RgbImage, bbox: &BoundingBox, thickness: u32, color: Rgb<u8>) {
    let x = bbox.x.round() as i32;
    let y = bbox.y.round() as i32;
    let width = bbox.width.round() as i32;
    let height = bbox.height.round() as i32;

    for inset in 0..thickness as i32 {
        let (w, h) = (width - 2 * inset, height - 2 * inset);
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(x + inset, y + inset).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(scene, rect, color);
    }
}
