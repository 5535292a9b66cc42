pub mod postprocess;
pub mod pose;
pub mod preprocessing;
pub mod registry;

use anyhow::Context;
use image::DynamicImage;

use crate::models::PoseDetection;
use postprocess::DecodeParams;
use registry::ModelRegistry;

pub use pose::RtenPoseModel;

/// A model that finds subjects and their landmarks in an image.
pub trait PoseModel: Send + Sync {
    /// Run the model over `image`; coordinates are in `image` pixels.
    fn infer(&self, image: &DynamicImage) -> anyhow::Result<Vec<PoseDetection>>;

    /// Human-readable name for this model (used in log output)
    fn name(&self) -> &str;
}

/// Settings for running a pose model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceParams {
    /// Side of the square model input
    pub input_size: u32,
    pub decode: DecodeParams,
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            decode: DecodeParams::default(),
        }
    }
}

/// Resolve `id` through the registry and load it.
pub fn load_model(
    registry: &ModelRegistry,
    id: &str,
    params: InferenceParams,
) -> anyhow::Result<Box<dyn PoseModel>> {
    let path = registry.resolve(id)?;
    log::info!("loading model '{}' from {}", id, path.display());

    let model = RtenPoseModel::load(&path, id, params)
        .with_context(|| format!("model '{}' could not be loaded", id))?;
    Ok(Box::new(model))
}
