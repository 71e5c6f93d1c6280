//! Error types for the classification flow
//!
//! Everything that travels inside an iced `Message` must be `Clone`, so the
//! underlying causes (io errors, decoder errors, tract errors) are kept as
//! rendered strings.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning compressed bytes into a pixel tensor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    /// The bytes are not an image the decoder understands
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The decoder produced a buffer that does not match its own dimensions
    #[error("decoded buffer has {actual} bytes but a {width}x{height} RGBA image needs {expected}")]
    MalformedInput {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Failures while reading the bytes behind an image reference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("unsupported image reference: {0}")]
    UnsupportedReference(String),

    #[error("failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },
}

/// Failures inside the model call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("could not prepare model input: {0}")]
    Input(String),

    #[error("model execution failed: {0}")]
    Run(String),

    #[error("model produced no scores")]
    EmptyOutput,
}

/// Failures while bringing up the runtime or loading the model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("model file not found: {0}")]
    MissingModel(PathBuf),

    #[error("failed to read labels from {path}: {reason}")]
    Labels { path: PathBuf, reason: String },

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("model loading task failed: {0}")]
    Task(String),
}

/// Failures while reading the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can go wrong during one classification attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Tensor(#[from] TensorError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// A blocking worker panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),
}

/// Coarse category of a classification failure, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Decode,
    MalformedInput,
    Inference,
    Internal,
}

impl ClassifyError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClassifyError::Fetch(_) => FailureKind::Fetch,
            ClassifyError::Tensor(TensorError::Decode(_)) => FailureKind::Decode,
            ClassifyError::Tensor(TensorError::MalformedInput { .. }) => FailureKind::MalformedInput,
            ClassifyError::Inference(_) => FailureKind::Inference,
            ClassifyError::Task(_) => FailureKind::Internal,
        }
    }
}

impl FailureKind {
    /// Short user-facing description
    pub fn describe(self) -> &'static str {
        match self {
            FailureKind::Fetch => "Could not read the selected image",
            FailureKind::Decode => "The selected file is not a supported image",
            FailureKind::MalformedInput => "The image decoded to inconsistent pixel data",
            FailureKind::Inference => "The model failed to classify the image",
            FailureKind::Internal => "Classification was interrupted",
        }
    }
}
