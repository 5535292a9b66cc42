use crate::detection::preprocessing::Letterbox;
use crate::error::PoseError;
use crate::models::{BoundingBox, Keypoint, PoseDetection};

/// Values per candidate before the keypoints: cx, cy, w, h, score.
const BOX_CHANNELS: usize = 5;

/// Values per keypoint: x, y, confidence.
const KEYPOINT_CHANNELS: usize = 3;

/// Thresholds applied while decoding raw model output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeParams {
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 300,
        }
    }
}

/// Raw `[batch, a, b]` pose output, either channels-first or channels-last.
pub struct RawPoseOutput<'a> {
    data: &'a [f32],
    channels: usize,
    anchors: usize,
    channels_first: bool,
}

impl<'a> RawPoseOutput<'a> {
    pub fn new(data: &'a [f32], shape: [usize; 3]) -> Result<Self, PoseError> {
        let unexpected = || PoseError::UnexpectedOutput {
            shape: shape.to_vec(),
        };

        let [batch, a, b] = shape;
        if batch == 0 || data.len() < a * b {
            return Err(unexpected());
        }

        let valid = |c: usize| c > BOX_CHANNELS && (c - BOX_CHANNELS) % KEYPOINT_CHANNELS == 0;
        let channels_first = match (valid(a), valid(b)) {
            // Candidate count normally dwarfs the channel count.
            (true, true) => a <= b,
            (true, false) => true,
            (false, true) => false,
            (false, false) => return Err(unexpected()),
        };
        let (channels, anchors) = if channels_first { (a, b) } else { (b, a) };

        Ok(Self {
            data: &data[..a * b],
            channels,
            anchors,
            channels_first,
        })
    }

    pub fn keypoint_count(&self) -> usize {
        (self.channels - BOX_CHANNELS) / KEYPOINT_CHANNELS
    }

    pub fn anchors(&self) -> usize {
        self.anchors
    }

    fn get(&self, channel: usize, anchor: usize) -> f32 {
        if self.channels_first {
            self.data[channel * self.anchors + anchor]
        } else {
            self.data[anchor * self.channels + channel]
        }
    }
}

/// Decode candidates, suppress overlaps and map results onto the source image.
pub fn decode(
    output: &RawPoseOutput<'_>,
    letterbox: &Letterbox,
    params: &DecodeParams,
    image_width: u32,
    image_height: u32,
) -> Vec<PoseDetection> {
    let keypoint_count = output.keypoint_count();
    let max_x = image_width as f32;
    let max_y = image_height as f32;

    let mut candidates = Vec::new();
    for anchor in 0..output.anchors() {
        let score = output.get(4, anchor);
        if !(score >= params.confidence_threshold) {
            continue;
        }

        let (cx, cy) = letterbox.to_source(output.get(0, anchor), output.get(1, anchor));
        let bbox = BoundingBox::from_center(
            cx,
            cy,
            letterbox.length_to_source(output.get(2, anchor)),
            letterbox.length_to_source(output.get(3, anchor)),
        )
        .clamp_to(image_width, image_height);

        let keypoints = (0..keypoint_count)
            .map(|k| {
                let base = BOX_CHANNELS + k * KEYPOINT_CHANNELS;
                let (x, y) = letterbox.to_source(output.get(base, anchor), output.get(base + 1, anchor));
                // Landmarks predicted off-image (in the padding or beyond) are not drawable.
                if (0.0..=max_x).contains(&x) && (0.0..=max_y).contains(&y) {
                    Keypoint::new(x, y, output.get(base + 2, anchor))
                } else {
                    Keypoint::missing()
                }
            })
            .collect();

        candidates.push(PoseDetection {
            bbox,
            score,
            keypoints,
        });
    }

    non_max_suppression(candidates, params.iou_threshold, params.max_detections)
}

/// Greedy NMS: keep the best-scoring box, drop everything overlapping it.
pub fn non_max_suppression(
    mut candidates: Vec<PoseDetection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<PoseDetection> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<PoseDetection> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        if kept
            .iter()
            .all(|k| k.bbox.iou(&candidate.bbox) <= iou_threshold)
        {
            kept.push(candidate);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    const K: usize = 2;
    const C: usize = BOX_CHANNELS + K * KEYPOINT_CHANNELS;

    /// Build a channels-first buffer from per-anchor rows.
    fn channels_first(rows: &[[f32; C]]) -> Vec<f32> {
        let n = rows.len();
        let mut data = vec![0.0; C * n];
        for (anchor, row) in rows.iter().enumerate() {
            for (channel, value) in row.iter().enumerate() {
                data[channel * n + anchor] = *value;
            }
        }
        data
    }

    fn identity() -> Letterbox {
        Letterbox::fit(100, 100, 100)
    }

    #[test]
    fn rejects_shapes_without_whole_keypoints() {
        let data = vec![0.0; 7 * 10];
        assert!(matches!(
            RawPoseOutput::new(&data, [1, 7, 10]),
            Err(PoseError::UnexpectedOutput { .. })
        ));
    }

    #[test]
    fn low_scores_are_dropped_and_overlaps_suppressed() {
        let rows = [
            [50.0, 50.0, 20.0, 20.0, 0.9, 45.0, 45.0, 0.8, 55.0, 55.0, 0.05],
            [51.0, 51.0, 20.0, 20.0, 0.7, 46.0, 46.0, 0.8, 56.0, 56.0, 0.8],
            [10.0, 10.0, 8.0, 8.0, 0.6, 9.0, 9.0, 0.9, 11.0, 11.0, 0.9],
            [80.0, 80.0, 8.0, 8.0, 0.1, 79.0, 79.0, 0.9, 81.0, 81.0, 0.9],
        ];
        let data = channels_first(&rows);
        let output = RawPoseOutput::new(&data, [1, C, rows.len()]).unwrap();
        assert_eq!(output.keypoint_count(), K);

        let detections = decode(&output, &identity(), &DecodeParams::default(), 100, 100);

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].score, 0.9);
        assert_eq!(detections[1].score, 0.6);
        assert_eq!(detections[0].keypoints[0], Keypoint::new(45.0, 45.0, 0.8));
        assert_eq!(detections[0].bbox, BoundingBox { x: 40.0, y: 40.0, width: 20.0, height: 20.0 });
    }

    #[test]
    fn channels_last_layout_decodes_the_same() {
        let row = [30.0, 30.0, 10.0, 10.0, 0.8, 28.0, 29.0, 0.7, 32.0, 31.0, 0.6];
        let mut data = Vec::new();
        for _ in 0..20 {
            data.extend_from_slice(&[0.0; C]);
        }
        data[..C].copy_from_slice(&row);

        let output = RawPoseOutput::new(&data, [1, 20, C]).unwrap();
        let detections = decode(&output, &identity(), &DecodeParams::default(), 100, 100);

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].keypoints[1], Keypoint::new(32.0, 31.0, 0.6));
    }

    #[test]
    fn coordinates_are_mapped_through_the_letterbox() {
        // 200x100 source in a 100x100 input: scale 0.5, 25px vertical padding.
        let fit = Letterbox::fit(200, 100, 100);
        let rows = [[50.0, 50.0, 10.0, 10.0, 0.9, 50.0, 25.0, 0.9, 0.0, 0.0, 0.9]];
        let data = channels_first(&rows);
        let output = RawPoseOutput::new(&data, [1, C, 1]).unwrap();

        let detections = decode(&output, &fit, &DecodeParams::default(), 200, 100);
        let kp = detections[0].keypoints[0];
        assert_eq!((kp.x, kp.y), (100.0, 0.0));
        assert_eq!(detections[0].bbox.width, 20.0);
    }

    #[test]
    fn keypoints_off_the_image_are_marked_missing() {
        // Second keypoint sits in the top padding of a 200x100 letterbox.
        let fit = Letterbox::fit(200, 100, 100);
        let rows = [[50.0, 50.0, 10.0, 10.0, 0.9, 60.0, 40.0, 0.9, 40.0, 10.0, 0.95]];
        let data = channels_first(&rows);
        let output = RawPoseOutput::new(&data, [1, C, 1]).unwrap();

        let detections = decode(&output, &fit, &DecodeParams::default(), 200, 100);
        let keypoints = &detections[0].keypoints;

        assert_eq!(keypoints[0], Keypoint::new(120.0, 30.0, 0.9));
        assert!(keypoints[1].is_missing());
        assert_eq!(keypoints[1].confidence, 0.0);
    }

    #[test]
    fn suppression_respects_the_detection_cap() {
        let detections = (0..5)
            .map(|i| PoseDetection {
                bbox: BoundingBox { x: i as f32 * 20.0, y: 0.0, width: 10.0, height: 10.0 },
                score: 0.5 + i as f32 * 0.1,
                keypoints: Vec::new(),
            })
            .collect();
        let kept = non_max_suppression(detections, 0.45, 3);
        assert_eq!(kept.len(), 3);
        assert!(kept[0].score > kept[1].score && kept[1].score > kept[2].score);
    }
}
