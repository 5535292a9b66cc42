use std::fmt;

use serde::Serialize;

use crate::annotate::skeleton::keypoint_names;

/// A single landmark in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Placeholder for a landmark the model was not confident about.
    pub fn missing() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn is_missing(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Axis-aligned box in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix = (self.max_x().min(other.max_x()) - self.x.max(other.x)).max(0.0);
        let iy = (self.max_y().min(other.max_y()) - self.y.max(other.y)).max(0.0);
        let intersection = ix * iy;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }

    /// Clip the box to `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let x1 = self.x.clamp(0.0, w);
        let y1 = self.y.clamp(0.0, h);
        let x2 = self.max_x().clamp(0.0, w);
        let y2 = self.max_y().clamp(0.0, h);
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }
}

/// One detected subject with its landmarks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseDetection {
    pub bbox: BoundingBox,
    pub score: f32,
    pub keypoints: Vec<Keypoint>,
}

/// Keypoints of every detection in an image, ready for annotation.
///
/// Each row holds the landmarks of one detection. Landmarks under the
/// keypoint threshold are replaced by [`Keypoint::missing`] so annotators
/// can skip them without knowing the threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyPoints {
    pub rows: Vec<Vec<Keypoint>>,
    pub scores: Vec<f32>,
    pub boxes: Vec<BoundingBox>,
    /// Landmark names when the layout is known, else empty.
    pub names: Vec<String>,
}

impl KeyPoints {
    pub fn from_detections(detections: &[PoseDetection], keypoint_threshold: f32) -> Self {
        let rows = detections
            .iter()
            .map(|det| {
                det.keypoints
                    .iter()
                    .map(|kp| {
                        if kp.confidence < keypoint_threshold {
                            Keypoint::missing()
                        } else {
                            *kp
                        }
                    })
                    .collect()
            })
            .collect();
        let scores = detections.iter().map(|det| det.score).collect();
        let boxes = detections.iter().map(|det| det.bbox).collect();
        let names = detections
            .first()
            .and_then(|det| keypoint_names(det.keypoints.len()))
            .map(|names| names.iter().map(|n| n.to_string()).collect())
            .unwrap_or_default();
        Self {
            rows,
            scores,
            boxes,
            names,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Keypoint]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Coordinates only, one row per detection.
    pub fn xy(&self) -> Vec<Vec<(f32, f32)>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|kp| (kp.x, kp.y)).collect())
            .collect()
    }

    /// Number of landmarks per detection (0 when empty).
    pub fn keypoints_per_detection(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }
}

impl fmt::Display for KeyPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "KeyPoints: {} detection(s), {} keypoint(s) each",
            self.len(),
            self.keypoints_per_detection()
        )?;
        for (i, row) in self.rows.iter().enumerate() {
            let score = self.scores.get(i).copied().unwrap_or(0.0);
            writeln!(f, "  [{}] score={:.2}", i, score)?;
            for (j, kp) in row.iter().enumerate() {
                let label = self.names.get(j).cloned().unwrap_or_else(|| j.to_string());
                if kp.is_missing() {
                    writeln!(f, "    {:>14}: -", label)?;
                } else {
                    writeln!(
                        f,
                        "    {:>14}: ({:.1}, {:.1}) conf={:.2}",
                        label, kp.x, kp.y, kp.confidence
                    )?;
                }
            }
        }
        Ok(())
    }
}
