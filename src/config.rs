//! Application configuration
//!
//! Stored as JSON in the user's config directory:
//! - Linux: ~/.config/photo-classifier/config.json
//! - macOS: ~/Library/Application Support/photo-classifier/config.json
//! - Windows: %APPDATA%\photo-classifier\config.json
//!
//! `PHOTO_CLASSIFIER_CONFIG` points at a different file. A missing file means
//! defaults; missing fields inside the file also fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const APP_DIR: &str = "photo-classifier";
const CONFIG_FILE: &str = "config.json";
const CONFIG_ENV: &str = "PHOTO_CLASSIFIER_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub picker: PickerConfig,
}

/// How pixel values are scaled before they reach the network
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// `(x / 255 - mean) / std` with the ImageNet channel statistics
    ImageNet,
    /// `x / 127.5 - 1`, i.e. [-1, 1]
    SignedUnit,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// ONNX model taking NCHW f32 input
    pub model_path: PathBuf,
    /// One label per line, in output index order
    pub labels_path: PathBuf,
    /// Square input edge the model expects (MobileNet: 224)
    pub input_size: u32,
    /// Number of predictions shown
    pub top_k: usize,
    pub normalization: Normalization,
    /// Whether the model outputs logits that still need a softmax
    pub apply_softmax: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let models = data_dir().join("models");
        Self {
            model_path: models.join("mobilenetv2-7.onnx"),
            labels_path: models.join("imagenet_labels.txt"),
            input_size: 224,
            top_k: 3,
            normalization: Normalization::ImageNet,
            apply_softmax: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PickerConfig {
    /// Where the picker opens and whose access is checked at startup
    pub library_dir: Option<PathBuf>,
    /// File extensions offered by the picker
    pub extensions: Vec<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            library_dir: dirs::picture_dir(),
            extensions: ["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load the config from the default location (or the env override)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    /// Load from an explicit file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Path of the config file, honouring `PHOTO_CLASSIFIER_CONFIG`
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }

    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(CONFIG_FILE);
    path
}

/// Per-user data directory for downloaded models
fn data_dir() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.json")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model.top_k, 3);
        assert_eq!(config.model.input_size, 224);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "model": {{ "top_k": 5, "normalization": "signed_unit", "model_path": "/models/m.onnx" }} }}"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();

        assert_eq!(config.model.top_k, 5);
        assert_eq!(config.model.normalization, Normalization::SignedUnit);
        assert_eq!(config.model.model_path, PathBuf::from("/models/m.onnx"));
        assert!(config.model.apply_softmax);
        assert_eq!(config.picker, PickerConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = AppConfig::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
