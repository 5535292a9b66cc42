use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::annotate::{Annotator, BoxAnnotator, Color, EdgeAnnotator, VertexAnnotator};
use crate::detection::InferenceParams;
use crate::detection::postprocess::DecodeParams;
use crate::detection::registry::ModelRegistry;
use crate::pipeline::DEFAULT_KEYPOINT_THRESHOLD;

#[derive(Parser, Debug, Clone)]
#[command(name = "ishpose")]
#[command(about = "Detect pose keypoints in an image and draw them as an overlay")]
pub struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE", default_value = "image.png")]
    pub image_path: PathBuf,

    /// Model identifier (registry name, `name/version`, or a path to a .rten file)
    #[arg(short, long, env = "ISHPOSE_MODEL", default_value = "ish")]
    pub model: String,

    /// Directory holding registry models [default: <user cache dir>/ishpose]
    #[arg(long, value_name = "DIR", env = "ISHPOSE_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Edge color: a name (green, red, blue, yellow, white, black, roboflow) or #rrggbb
    #[arg(long, default_value = "green")]
    pub color: Color,

    /// Edge thickness in pixels
    #[arg(long, default_value_t = 5)]
    pub thickness: u32,

    /// Also draw a dot on every keypoint
    #[arg(long)]
    pub vertices: bool,

    /// Do not outline detection boxes
    #[arg(long)]
    pub no_boxes: bool,

    /// Keypoint dot radius in pixels
    #[arg(long, default_value_t = 4)]
    pub radius: u32,

    /// Minimum detection score
    #[arg(long, default_value_t = 0.25)]
    pub confidence: f32,

    /// Minimum keypoint confidence; weaker keypoints are not drawn
    #[arg(long, default_value_t = DEFAULT_KEYPOINT_THRESHOLD)]
    pub keypoint_confidence: f32,

    /// IoU above which overlapping detections are suppressed
    #[arg(long, default_value_t = 0.45)]
    pub iou: f32,

    /// Side of the square model input in pixels
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(32..=8192))]
    pub input_size: u32,

    /// Save the annotated image to this path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Do not open the viewer window
    #[arg(long)]
    pub no_display: bool,

    /// Print keypoints as JSON
    #[arg(long)]
    pub json: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    pub debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn registry(&self) -> anyhow::Result<ModelRegistry> {
        match &self.model_dir {
            Some(dir) => Ok(ModelRegistry::new(dir)),
            None => ModelRegistry::from_env(),
        }
    }

    pub fn inference_params(&self) -> InferenceParams {
        InferenceParams {
            input_size: self.input_size,
            decode: DecodeParams {
                confidence_threshold: self.confidence,
                iou_threshold: self.iou,
                ..DecodeParams::default()
            },
        }
    }

    /// Annotators in drawing order: boxes, then edges, then vertices on top.
    pub fn annotators(&self) -> Vec<Arc<dyn Annotator>> {
        let mut annotators: Vec<Arc<dyn Annotator>> = Vec::new();
        if !self.no_boxes {
            annotators.push(Arc::new(BoxAnnotator::new(self.color, 2)));
        }
        annotators.push(Arc::new(EdgeAnnotator::new(self.color, self.thickness)));
        if self.vertices {
            annotators.push(Arc::new(VertexAnnotator::new(self.color, self.radius)));
        }
        annotators
    }

    /// Where to write the image when no window will be shown.
    pub fn fallback_output(&self) -> Option<PathBuf> {
        if self.output.is_some() {
            return self.output.clone();
        }
        if self.no_display || !crate::display::can_show() {
            return Some(PathBuf::from("annotated.png"));
        }
        None
    }
}
