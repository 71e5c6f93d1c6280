//! MobileNet classifier running on tract
//!
//! The model takes a single NCHW f32 image of `input_size` x `input_size`.
//! Resizing and normalisation happen here, so callers only ever hand over
//! the raw RGB tensor.

use std::fmt;
use std::path::Path;

use image::{imageops, imageops::FilterType, RgbImage};
use tract_onnx::prelude::*;
use tracing::{debug, info};

use super::ranking::rank;
use super::{Classifier, Labels, ModelAssets, Prediction};
use crate::config::{Normalization, ModelConfig};
use crate::error::{InferenceError, ModelError};
use crate::tensor::PixelTensor;

type Plan = TypedRunnableModel<TypedModel>;

/// ImageNet channel statistics (RGB)
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

pub struct MobileNet {
    plan: Plan,
    labels: Labels,
    input_size: u32,
    normalization: Normalization,
    top_k: usize,
    apply_softmax: bool,
}

impl MobileNet {
    /// Parse, optimize and make the model runnable. Blocking.
    pub fn load(assets: ModelAssets) -> Result<Self, ModelError> {
        let ModelAssets { config, labels } = assets;

        info!("🧠 Loading model from {}", config.model_path.display());

        // Pin the input shape so tract can type the whole graph
        let model = parse_onnx(&config.model_path, config.input_size)
            .map_err(|e| ModelError::Load(format!("{:#}", e)))?;

        let classifier = Self::from_typed(model, labels, &config)?;
        info!("✅ Model ready ({}x{} input)", config.input_size, config.input_size);

        Ok(classifier)
    }

    /// Wrap an already typed graph taking `[1, 3, size, size]` f32 input
    pub fn from_typed(model: TypedModel, labels: Labels, config: &ModelConfig) -> Result<Self, ModelError> {
        let plan = model
            .into_optimized()
            .and_then(|model| model.into_runnable())
            .map_err(|e| ModelError::Load(format!("{:#}", e)))?;

        Ok(Self {
            plan,
            labels,
            input_size: config.input_size,
            normalization: config.normalization,
            top_k: config.top_k,
            apply_softmax: config.apply_softmax,
        })
    }
}

fn parse_onnx(path: &Path, input_size: u32) -> TractResult<TypedModel> {
    let size = input_size as usize;
    tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(0, f32::fact([1, 3, size, size]).into())?
        .into_typed()
}

impl Classifier for MobileNet {
    fn infer(&self, tensor: &PixelTensor) -> Result<Vec<Prediction>, InferenceError> {
        // Resize + normalise into NCHW
        let input = to_model_input(tensor, self.input_size, self.normalization)?;

        let outputs = self
            .plan
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| InferenceError::Run(format!("{:#}", e)))?;

        // First output holds one score per class, whatever its exact shape
        let output = outputs.first().ok_or(InferenceError::EmptyOutput)?;
        let scores: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Run(format!("{:#}", e)))?
            .iter()
            .copied()
            .collect();

        if scores.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }

        debug!("Model produced {} scores", scores.len());
        Ok(rank(&scores, &self.labels, self.top_k, self.apply_softmax))
    }
}

impl fmt::Debug for MobileNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MobileNet")
            .field("labels", &self.labels.len())
            .field("input_size", &self.input_size)
            .field("normalization", &self.normalization)
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl Normalization {
    /// Scale one 8-bit sample of the given RGB channel
    pub fn apply(self, channel: usize, value: u8) -> f32 {
        let value = f32::from(value);
        match self {
            Normalization::ImageNet => {
                (value / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel]
            }
            Normalization::SignedUnit => value / 127.5 - 1.0,
        }
    }
}

/// Resize the RGB tensor and lay it out as a `[1, 3, size, size]` f32 tensor
pub fn to_model_input(
    tensor: &PixelTensor,
    input_size: u32,
    normalization: Normalization,
) -> Result<Tensor, InferenceError> {
    if tensor.width() == 0 || tensor.height() == 0 {
        return Err(InferenceError::Input("image has no pixels".to_string()));
    }

    let width = u32::try_from(tensor.width())
        .map_err(|_| InferenceError::Input("image too wide".to_string()))?;
    let height = u32::try_from(tensor.height())
        .map_err(|_| InferenceError::Input("image too tall".to_string()))?;

    let rgb = RgbImage::from_raw(width, height, tensor.data().to_vec())
        .ok_or_else(|| InferenceError::Input("pixel data does not match shape".to_string()))?;

    let resized = imageops::resize(&rgb, input_size, input_size, FilterType::Triangle);

    let size = input_size as usize;
    let array = tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| {
        let pixel = resized.get_pixel(x as u32, y as u32);
        normalization.apply(c, pixel[c])
    });

    Ok(array.into_tensor())
}
