use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, ImageBuffer, Rgb};
use ishpose::{BoundingBox, Keypoint, PoseDetection, PoseModel};
use tempfile::NamedTempFile;

/// Creates a gray test image of the given size and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image(width: u32, height: u32) -> NamedTempFile {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([40u8, 40u8, 40u8]));
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// In-memory gray scene.
pub fn gray_scene(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([40u8, 40u8, 40u8])))
}

/// COCO-ordered keypoints of a standing figure, relative to a unit box.
const FIGURE: [(f32, f32); 17] = [
    (0.50, 0.08),
    (0.47, 0.06),
    (0.53, 0.06),
    (0.44, 0.08),
    (0.56, 0.08),
    (0.38, 0.22),
    (0.62, 0.22),
    (0.32, 0.38),
    (0.68, 0.38),
    (0.30, 0.52),
    (0.70, 0.52),
    (0.42, 0.55),
    (0.58, 0.55),
    (0.42, 0.75),
    (0.58, 0.75),
    (0.42, 0.95),
    (0.58, 0.95),
];

/// A figure filling `image`, with the given keypoint confidence.
pub fn standing_figure(width: u32, height: u32, keypoint_confidence: f32) -> PoseDetection {
    let (w, h) = (width as f32, height as f32);
    PoseDetection {
        bbox: BoundingBox { x: 0.25 * w, y: 0.0, width: 0.5 * w, height: h },
        score: 0.9,
        keypoints: FIGURE
            .iter()
            .map(|&(x, y)| Keypoint::new(x * w, y * h, keypoint_confidence))
            .collect(),
    }
}

/// Model returning one standing figure per image and counting its calls.
#[derive(Clone, Default)]
pub struct FakePoseModel {
    pub calls: Arc<AtomicUsize>,
    pub keypoint_confidence: Option<f32>,
}

impl FakePoseModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PoseModel for FakePoseModel {
    fn infer(&self, image: &DynamicImage) -> anyhow::Result<Vec<PoseDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let confidence = self.keypoint_confidence.unwrap_or(0.9);
        Ok(vec![standing_figure(image.width(), image.height(), confidence)])
    }

    fn name(&self) -> &str {
        "fake-pose"
    }
}
