//! Classification orchestrator
//!
//! resolve reference -> read bytes -> build tensor -> infer
//!
//! Decoding and inference are CPU-bound and run on tokio's blocking pool so
//! the UI keeps painting. Publishing the result is left to the state machine,
//! which knows whether the request is still current.

use std::sync::Arc;

use tokio::task;
use tracing::{debug, info};

use crate::acquire::{fetch_bytes, ImageReference};
use crate::error::ClassifyError;
use crate::model::{Classifier, Prediction};
use crate::tensor::{build_tensor, Decode};

/// The collaborators one classification needs
#[derive(Clone)]
pub struct Pipeline {
    decoder: Arc<dyn Decode>,
    classifier: Arc<dyn Classifier>,
}

impl Pipeline {
    pub fn new(decoder: Arc<dyn Decode>, classifier: Arc<dyn Classifier>) -> Self {
        Self { decoder, classifier }
    }

    /// Run one classification end to end
    pub async fn classify(&self, reference: ImageReference) -> Result<Vec<Prediction>, ClassifyError> {
        // Resolve the reference and read the whole file
        let bytes = fetch_bytes(&reference).await?;
        debug!("Read {} bytes from {}", bytes.len(), reference);

        // Decode + strip alpha on the blocking pool
        let decoder = Arc::clone(&self.decoder);
        let tensor = task::spawn_blocking(move || build_tensor(&bytes, decoder.as_ref()))
            .await
            .map_err(|e| ClassifyError::Task(e.to_string()))??;
        debug!("Built tensor {:?}", tensor.shape());

        // Inference is the slow part; same treatment
        let classifier = Arc::clone(&self.classifier);
        let predictions = task::spawn_blocking(move || classifier.infer(&tensor))
            .await
            .map_err(|e| ClassifyError::Task(e.to_string()))??;

        info!(
            "🔎 Classified {}: {}",
            reference.file_name(),
            predictions
                .first()
                .map(|p| format!("{} ({:.1}%)", p.label, p.probability * 100.0))
                .unwrap_or_else(|| "no predictions".to_string())
        );

        Ok(predictions)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("classifier", &self.classifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, InferenceError, TensorError};
    use crate::tensor::decode::DecodedImage;
    use crate::tensor::{ImageDecoder, PixelTensor};
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records the tensor it was given and answers with a fixed ranking
    #[derive(Debug, Default)]
    struct RecordingClassifier {
        seen: Mutex<Vec<PixelTensor>>,
    }

    impl Classifier for RecordingClassifier {
        fn infer(&self, tensor: &PixelTensor) -> Result<Vec<Prediction>, InferenceError> {
            self.seen.lock().unwrap().push(tensor.clone());
            Ok(vec![
                Prediction { label: "tabby".into(), probability: 0.7 },
                Prediction { label: "tiger cat".into(), probability: 0.2 },
            ])
        }
    }

    #[derive(Debug)]
    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn infer(&self, _tensor: &PixelTensor) -> Result<Vec<Prediction>, InferenceError> {
            Err(InferenceError::Run("out of memory".into()))
        }
    }

    struct ShortDecoder;

    impl Decode for ShortDecoder {
        fn decode(&self, _bytes: &[u8]) -> Result<DecodedImage, TensorError> {
            Ok(DecodedImage { width: 4, height: 4, data: vec![0; 10] })
        }
    }

    fn write_png(path: &Path) {
        let img = RgbaImage::from_raw(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 255]).unwrap();
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[tokio::test]
    async fn test_classify_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixels.png");
        write_png(&path);

        let classifier = Arc::new(RecordingClassifier::default());
        let pipeline = Pipeline::new(Arc::new(ImageDecoder), classifier.clone());

        let predictions = pipeline.classify(ImageReference::from_path(&path)).await.unwrap();

        assert_eq!(predictions[0].label, "tabby");
        let seen = classifier.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].shape(), [1, 2, 3]);
        assert_eq!(seen[0].data(), &[10, 20, 30, 40, 50, 60]);
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(Arc::new(ImageDecoder), Arc::new(RecordingClassifier::default()));

        let err = pipeline
            .classify(ImageReference::from_path(&dir.path().join("nope.jpg")))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Fetch);
    }

    #[tokio::test]
    async fn test_undecodable_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"shopping list").unwrap();

        let classifier = Arc::new(RecordingClassifier::default());
        let pipeline = Pipeline::new(Arc::new(ImageDecoder), classifier.clone());

        let err = pipeline.classify(ImageReference::from_path(&path)).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::Decode);
        assert!(classifier.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inconsistent_decoder_output_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixels.png");
        write_png(&path);

        let pipeline = Pipeline::new(Arc::new(ShortDecoder), Arc::new(RecordingClassifier::default()));

        let err = pipeline.classify(ImageReference::from_path(&path)).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedInput);
    }

    #[tokio::test]
    async fn test_model_failure_is_inference_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixels.png");
        write_png(&path);

        let pipeline = Pipeline::new(Arc::new(ImageDecoder), Arc::new(FailingClassifier));

        let err = pipeline.classify(ImageReference::from_path(&path)).await.unwrap_err();
        assert_eq!(
            err,
            ClassifyError::Inference(InferenceError::Run("out of memory".into()))
        );
    }
}
