use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::annotate::{Annotator, Color};
use crate::models::KeyPoints;

/// Draws a dot on every present keypoint.
#[derive(Debug, Clone)]
pub struct VertexAnnotator {
    pub color: Color,
    pub radius: u32,
}

impl VertexAnnotator {
    pub fn new(color: Color, radius: u32) -> Self {
        Self { color, radius }
    }
}

impl Default for VertexAnnotator {
    fn default() -> Self {
        Self::new(Color::ROBOFLOW, 4)
    }
}

impl Annotator for VertexAnnotator {
    fn annotate(&self, scene: &mut RgbImage, key_points: &KeyPoints) {
        let color: Rgb<u8> = self.color.into();
        let radius = self.radius as i32;

        for kp in key_points.iter().flatten().filter(|kp| !kp.is_missing()) {
            draw_filled_circle_mut(scene, (kp.x.round() as i32, kp.y.round() as i32), radius, color);
        }
    }

    fn name(&self) -> &str {
        "Vertex Annotator"
    }
}
