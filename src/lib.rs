pub mod annotate;
pub mod app;
pub mod config;
pub mod detection;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;

pub use annotate::{Annotator, BoxAnnotator, Color, EdgeAnnotator, Skeleton, VertexAnnotator};
pub use detection::{InferenceParams, PoseModel, RtenPoseModel, load_model};
pub use error::PoseError;
pub use models::{BoundingBox, KeyPoints, Keypoint, PoseDetection};
pub use pipeline::{Pipeline, PipelineContext, PipelineOutput, DebugConfig, read_image};

#[cfg(feature = "gui")]
pub mod gui;
