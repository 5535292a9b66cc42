use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::annotate::{Annotator, Color, Skeleton};
use crate::models::{KeyPoints, Keypoint};

/// Draws skeleton edges between present keypoints.
///
/// Rows whose keypoint count matches no known skeleton are drawn as dots
/// instead, so unfamiliar models still show their landmarks.
#[derive(Debug, Clone)]
pub struct EdgeAnnotator {
    pub color: Color,
    pub thickness: u32,
    /// Edges to draw; picked from the keypoint count when `None`.
    pub skeleton: Option<Skeleton>,
}

impl EdgeAnnotator {
    pub fn new(color: Color, thickness: u32) -> Self {
        Self {
            color,
            thickness,
            skeleton: None,
        }
    }

    pub fn with_skeleton(mut self, skeleton: Skeleton) -> Self {
        self.skeleton = Some(skeleton);
        self
    }

    fn skeleton_for(&self, keypoint_count: usize) -> Option<Skeleton> {
        self.skeleton
            .clone()
            .or_else(|| Skeleton::for_keypoint_count(keypoint_count))
    }
}

impl Default for EdgeAnnotator {
    fn default() -> Self {
        Self::new(Color::ROBOFLOW, 2)
    }
}

impl Annotator for EdgeAnnotator {
    fn annotate(&self, scene: &mut RgbImage, key_points: &KeyPoints) {
        let color: Rgb<u8> = self.color.into();

        if self.thickness == 0 {
            return;
        }

        for row in key_points.iter() {
            let Some(skeleton) = self.skeleton_for(row.len()) else {
                log::debug!("no skeleton for {} keypoints, drawing vertices", row.len());
                draw_vertices(scene, row, self.thickness, color);
                continue;
            };

            for &(a, b) in skeleton.edges() {
                let (Some(start), Some(end)) = (row.get(a), row.get(b)) else {
                    continue;
                };
                if start.is_missing() || end.is_missing() {
                    continue;
                }
                draw_thick_segment(scene, start, end, self.thickness, color);
            }
        }
    }

    fn name(&self) -> &str {
        "Edge Annotator"
    }
}

fn draw_vertices(scene: &mut RgbImage, row: &[Keypoint], thickness: u32, color: Rgb<u8>) {
    let radius = (thickness as i32 / 2).max(1);
    for kp in row.iter().filter(|kp| !kp.is_missing()) {
        draw_filled_circle_mut(scene, (kp.x.round() as i32, kp.y.round() as i32), radius, color);
    }
}

/// Segment of the given width with round caps. Zero width draws nothing.
fn draw_thick_segment(scene: &mut RgbImage, start: &Keypoint, end: &Keypoint, thickness: u32, color: Rgb<u8>) {
    if thickness == 0 {
        return;
    }
    if thickness == 1 {
        draw_line_segment_mut(scene, (start.x, start.y), (end.x, end.y), color);
        return;
    }

    let half = thickness as f32 / 2.0;
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let length = (dx * dx + dy * dy).sqrt();

    if length > f32::EPSILON {
        let (nx, ny) = (-dy / length * half, dx / length * half);
        let corner = |x: f32, y: f32| Point::new(x.round() as i32, y.round() as i32);
        let quad = [
            corner(start.x + nx, start.y + ny),
            corner(end.x + nx, end.y + ny),
            corner(end.x - nx, end.y - ny),
            corner(start.x - nx, start.y - ny),
        ];
        if quad[0] != quad[3] {
            draw_polygon_mut(scene, &quad, color);
        }
    }

    let radius = (half.round() as i32).max(1);
    for kp in [start, end] {
        draw_filled_circle_mut(scene, (kp.x.round() as i32, kp.y.round() as i32), radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_row(points: &[(f32, f32)]) -> KeyPoints {
        KeyPoints {
            rows: vec![points.iter().map(|&(x, y)| Keypoint::new(x, y, 1.0)).collect()],
            scores: vec![1.0],
            ..KeyPoints::default()
        }
    }

    #[test]
    fn draws_thick_edges_between_present_points() {
        let mut scene = RgbImage::new(50, 50);
        let annotator = EdgeAnnotator::new(Color::GREEN, 5).with_skeleton(Skeleton::new(vec![(0, 1)]));
        annotator.annotate(&mut scene, &single_row(&[(10.0, 25.0), (40.0, 25.0)]));

        assert_eq!(scene.get_pixel(25, 25), &Rgb([0, 255, 0]));
        assert_eq!(scene.get_pixel(25, 27), &Rgb([0, 255, 0]));
        assert_eq!(scene.get_pixel(25, 10), &Rgb([0, 0, 0]));
    }

    #[test]
    fn skips_edges_touching_missing_points() {
        let mut scene = RgbImage::new(50, 50);
        let mut key_points = single_row(&[(10.0, 25.0), (40.0, 25.0)]);
        key_points.rows[0][1] = Keypoint::missing();

        let annotator = EdgeAnnotator::new(Color::GREEN, 5).with_skeleton(Skeleton::new(vec![(0, 1)]));
        annotator.annotate(&mut scene, &key_points);

        assert!(scene.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn unknown_keypoint_layouts_fall_back_to_vertices() {
        let mut scene = RgbImage::new(20, 20);
        EdgeAnnotator::new(Color::GREEN, 3).annotate(&mut scene, &single_row(&[(3.0, 3.0), (16.0, 16.0)]));

        assert_eq!(scene.get_pixel(3, 3), &Rgb([0, 255, 0]));
        assert_eq!(scene.get_pixel(16, 16), &Rgb([0, 255, 0]));
        // no edge between them
        assert_eq!(scene.get_pixel(10, 10), &Rgb([0, 0, 0]));
    }

    #[test]
    fn head_layout_is_joined_without_an_explicit_skeleton() {
        let mut scene = RgbImage::new(60, 60);
        let head = single_row(&[
            (20.0, 20.0),
            (40.0, 20.0),
            (30.0, 10.0),
            (30.0, 45.0),
            (22.0, 45.0),
            (38.0, 45.0),
        ]);
        EdgeAnnotator::new(Color::GREEN, 3).annotate(&mut scene, &head);

        // eye-1 to eye-2
        assert_eq!(scene.get_pixel(30, 20), &Rgb([0, 255, 0]));
        // mouth line
        assert_eq!(scene.get_pixel(26, 45), &Rgb([0, 255, 0]));
        assert_eq!(scene.get_pixel(30, 32), &Rgb([0, 0, 0]));
    }

    #[test]
    fn zero_thickness_draws_nothing() {
        let mut scene = RgbImage::new(30, 30);
        let annotator = EdgeAnnotator::new(Color::GREEN, 0).with_skeleton(Skeleton::new(vec![(0, 1)]));
        annotator.annotate(&mut scene, &single_row(&[(5.0, 15.0), (25.0, 15.0)]));
        EdgeAnnotator::new(Color::GREEN, 0).annotate(&mut scene, &single_row(&[(5.0, 5.0)]));

        assert!(scene.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn unit_thickness_draws_a_thin_line() {
        let mut scene = RgbImage::new(30, 30);
        let annotator = EdgeAnnotator::new(Color::GREEN, 1).with_skeleton(Skeleton::new(vec![(0, 1)]));
        annotator.annotate(&mut scene, &single_row(&[(5.0, 15.0), (25.0, 15.0)]));

        assert_eq!(scene.get_pixel(15, 15), &Rgb([0, 255, 0]));
        assert_eq!(scene.get_pixel(15, 17), &Rgb([0, 0, 0]));
    }

    #[test]
    fn edges_leaving_the_image_are_clipped() {
        let mut scene = RgbImage::new(20, 20);
        let annotator = EdgeAnnotator::new(Color::RED, 4).with_skeleton(Skeleton::new(vec![(0, 1)]));
        annotator.annotate(&mut scene, &single_row(&[(10.0, 10.0), (200.0, 10.0)]));

        assert_eq!(scene.dimensions(), (20, 20));
        assert_eq!(scene.get_pixel(19, 10), &Rgb([255, 0, 0]));
    }
}
