use std::path::Path;

use image::{DynamicImage, GenericImageView};
use rten::Model;
use rten_tensor::NdTensor;
use rten_tensor::prelude::*;

use crate::detection::postprocess::{self, RawPoseOutput};
use crate::detection::preprocessing;
use crate::detection::{InferenceParams, PoseModel};
use crate::error::PoseError;
use crate::models::PoseDetection;

/// YOLOv8-pose style model executed with rten.
pub struct RtenPoseModel {
    model: Model,
    name: String,
    params: InferenceParams,
}

impl RtenPoseModel {
    pub fn load(path: &Path, name: impl Into<String>, params: InferenceParams) -> Result<Self, PoseError> {
        let model = Model::load_file(path).map_err(|e| PoseError::ModelLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self {
            model,
            name: name.into(),
            params,
        })
    }

    pub fn params(&self) -> &InferenceParams {
        &self.params
    }
}

impl PoseModel for RtenPoseModel {
    fn infer(&self, image: &DynamicImage) -> anyhow::Result<Vec<PoseDetection>> {
        let size = self.params.input_size;
        preprocessing::validate_input(image, size)?;

        let (width, height) = image.dimensions();
        let (input_image, fit) = preprocessing::letterbox(image, size);
        log::debug!(
            "letterboxed {}x{} to {}x{} (scale {:.3}, pad {}x{})",
            width, height, size, size, fit.scale, fit.pad_x, fit.pad_y
        );

        let input = NdTensor::from_data(
            [1, 3, size as usize, size as usize],
            preprocessing::to_chw(&input_image),
        );

        let value = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| PoseError::Inference(e.to_string()))?;
        let output: NdTensor<f32, 3> = value
            .try_into()
            .map_err(|_| PoseError::Inference("model output is not a rank-3 f32 tensor".into()))?;

        let shape = output.shape();
        let data = output.to_vec();
        let raw = RawPoseOutput::new(&data, shape)?;
        log::debug!(
            "model output {:?}: {} candidates, {} keypoints each",
            shape,
            raw.anchors(),
            raw.keypoint_count()
        );

        Ok(postprocess::decode(&raw, &fit, &self.params.decode, width, height))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
