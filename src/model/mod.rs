/// Model module
///
/// Bringing the classifier up happens in two steps, mirroring the two
/// readiness flags in the UI:
/// - `runtime_ready`: check the model asset and read the label table
/// - `load`: parse and optimize the ONNX graph (the slow part)
///
/// After that the classifier is shared read-only behind an `Arc`.

pub mod labels;
pub mod mobilenet;
pub mod ranking;

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::config::ModelConfig;
use crate::error::{InferenceError, ModelError};
use crate::tensor::PixelTensor;

pub use labels::Labels;
pub use mobilenet::MobileNet;

/// One ranked guess from the model
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Always within [0, 1]
    pub probability: f32,
}

/// A loaded model that can classify pixel tensors
///
/// Results are ranked by descending probability.
pub trait Classifier: Send + Sync + fmt::Debug {
    fn infer(&self, tensor: &PixelTensor) -> Result<Vec<Prediction>, InferenceError>;
}

/// Everything needed to build the classifier, checked and read from disk
#[derive(Debug, Clone)]
pub struct ModelAssets {
    pub config: ModelConfig,
    pub labels: Labels,
}

/// Prepare the runtime: verify the model file exists and read the labels
pub async fn runtime_ready(config: ModelConfig) -> Result<ModelAssets, ModelError> {
    let is_file = tokio::fs::metadata(&config.model_path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(ModelError::MissingModel(config.model_path.clone()));
    }

    let text = tokio::fs::read_to_string(&config.labels_path)
        .await
        .map_err(|e| ModelError::Labels {
            path: config.labels_path.clone(),
            reason: e.to_string(),
        })?;
    let labels = Labels::parse(&text).map_err(|reason| ModelError::Labels {
        path: config.labels_path.clone(),
        reason,
    })?;

    info!("⚙️  Runtime ready: {} labels from {}", labels.len(), config.labels_path.display());

    Ok(ModelAssets { config, labels })
}

/// Load the model graph off the UI thread
pub async fn load(assets: ModelAssets) -> Result<Arc<dyn Classifier>, ModelError> {
    let model = tokio::task::spawn_blocking(move || MobileNet::load(assets))
        .await
        .map_err(|e| ModelError::Task(e.to_string()))??;

    Ok(Arc::new(model))
}
