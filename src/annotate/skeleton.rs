/// COCO-Pose edges as pairs of keypoint indices.
pub const COCO_EDGES: [(usize, usize); 19] = [
    (15, 13),
    (13, 11),
    (16, 14),
    (14, 12),
    (11, 12),
    (5, 11),
    (6, 12),
    (5, 6),
    (5, 7),
    (6, 8),
    (7, 9),
    (8, 10),
    (1, 2),
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 4),
    (3, 5),
    (4, 6),
];

pub const COCO_KEYPOINT_NAMES: [&str; 17] = [
    "nose",
    "left-eye",
    "right-eye",
    "left-ear",
    "right-ear",
    "left-shoulder",
    "right-shoulder",
    "left-elbow",
    "right-elbow",
    "left-wrist",
    "right-wrist",
    "left-hip",
    "right-hip",
    "left-knee",
    "right-knee",
    "left-ankle",
    "right-ankle",
];

/// Head-pose landmarks emitted by the `ish` model.
pub const HEAD_KEYPOINT_NAMES: [&str; 6] = [
    "eye-1",
    "eye-2",
    "forehead",
    "mouth-center",
    "mouth-1",
    "mouth-2",
];

/// Eye triangle through the forehead, plus the mouth line.
pub const HEAD_EDGES: [(usize, usize); 5] = [(0, 1), (0, 2), (1, 2), (4, 3), (3, 5)];

pub const COCO_KEYPOINT_COUNT: usize = COCO_KEYPOINT_NAMES.len();
pub const HEAD_KEYPOINT_COUNT: usize = HEAD_KEYPOINT_NAMES.len();

/// Landmark names for models emitting `count` keypoints per detection.
pub fn keypoint_names(count: usize) -> Option<&'static [&'static str]> {
    match count {
        COCO_KEYPOINT_COUNT => Some(&COCO_KEYPOINT_NAMES),
        HEAD_KEYPOINT_COUNT => Some(&HEAD_KEYPOINT_NAMES),
        _ => None,
    }
}

/// Which keypoints are joined by edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    edges: Vec<(usize, usize)>,
}

impl Skeleton {
    pub fn new(edges: Vec<(usize, usize)>) -> Self {
        Self { edges }
    }

    pub fn coco() -> Self {
        Self::new(COCO_EDGES.to_vec())
    }

    pub fn head() -> Self {
        Self::new(HEAD_EDGES.to_vec())
    }

    /// Known skeleton for models emitting `count` keypoints per detection.
    pub fn for_keypoint_count(count: usize) -> Option<Self> {
        match count {
            COCO_KEYPOINT_COUNT => Some(Self::coco()),
            HEAD_KEYPOINT_COUNT => Some(Self::head()),
            _ => None,
        }
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}
