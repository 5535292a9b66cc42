use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use image::{DynamicImage, ImageReader, RgbImage};

use crate::annotate::{Annotator, annotate_copy};
use crate::detection::PoseModel;
use crate::error::PoseError;
use crate::models::{KeyPoints, PoseDetection};

/// Keypoints under this confidence are treated as missing.
pub const DEFAULT_KEYPOINT_THRESHOLD: f32 = 0.1;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context shared by every stage of a run
#[derive(Clone, Debug)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
    pub keypoint_threshold: f32,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub detections: Vec<PoseDetection>,
    pub key_points: KeyPoints,
    pub annotated: RgbImage,
}

/// Model plus the annotators drawn over its results.
pub struct Pipeline {
    model: Box<dyn PoseModel>,
    annotators: Vec<Arc<dyn Annotator>>,
    context: PipelineContext,
}

impl Pipeline {
    pub fn new(model: Box<dyn PoseModel>) -> Self {
        Self {
            model,
            annotators: Vec::new(),
            context: PipelineContext {
                verbose: false,
                debug: None,
                keypoint_threshold: DEFAULT_KEYPOINT_THRESHOLD,
            },
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    pub fn with_keypoint_threshold(mut self, threshold: f32) -> Self {
        self.context.keypoint_threshold = threshold;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                anyhow::bail!("Debug directory is not empty: {}", output_dir.display());
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add an annotator; annotators draw in insertion order
    pub fn add_annotator(mut self, annotator: Arc<dyn Annotator>) -> Self {
        self.annotators.push(annotator);
        self
    }

    /// Helper method to add an annotator from a Box (for convenience)
    pub fn add_annotator_boxed(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.annotators.push(Arc::from(annotator));
        self
    }

    pub fn model(&self) -> &dyn PoseModel {
        self.model.as_ref()
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Read `path` and run the pipeline on it.
    pub fn run_file(&self, path: &Path) -> Result<PipelineOutput> {
        let image = read_image(path)?;
        self.run(&image)
    }

    /// Infer on `input`, convert to keypoints and draw onto a copy.
    pub fn run(&self, input: &DynamicImage) -> Result<PipelineOutput> {
        self.save_debug("00_input", &input.to_rgb8())?;

        log::info!(
            "running '{}' on {}x{} image",
            self.model.name(),
            input.width(),
            input.height()
        );
        let detections = self.model.infer(input)?;
        log::info!("{} detection(s)", detections.len());
        if self.context.verbose {
            for (i, det) in detections.iter().enumerate() {
                log::info!(
                    "  detection {}: score {:.2} at ({:.0}, {:.0}) {:.0}x{:.0}",
                    i + 1,
                    det.score,
                    det.bbox.x,
                    det.bbox.y,
                    det.bbox.width,
                    det.bbox.height
                );
            }
        }

        let key_points = KeyPoints::from_detections(&detections, self.context.keypoint_threshold);

        let annotated = annotate_copy(input, &key_points, &self.annotators, |idx, annotator, canvas| {
            let step_dir = format!(
                "{:02}_{}",
                idx + 1,
                annotator.name().to_lowercase().replace(' ', "_")
            );
            self.save_debug(&step_dir, canvas)
        })?;

        Ok(PipelineOutput {
            detections,
            key_points,
            annotated,
        })
    }

    fn save_debug(&self, step_dir_name: &str, image: &RgbImage) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };

        let step_dir = debug_config.output_dir.join(step_dir_name);
        std::fs::create_dir_all(&step_dir)?;
        let output_path = step_dir.join("01.png");
        image
            .save(&output_path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

        log::debug!("saved {}/01.png", step_dir_name);
        Ok(())
    }
}

/// Decode the image at `path`.
pub fn read_image(path: &Path) -> Result<DynamicImage, PoseError> {
    let image_read = |source| PoseError::ImageRead {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(|e| image_read(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| image_read(image::ImageError::IoError(e)))?
        .decode()
        .map_err(image_read)
}
