mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from ishpose for tests
pub use ishpose::{
    Annotator, BoundingBox, BoxAnnotator, Color, EdgeAnnotator, KeyPoints, Keypoint, Pipeline, PoseDetection,
    PoseError, PoseModel, Skeleton, VertexAnnotator,
};
