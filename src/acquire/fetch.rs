//! Binary fetch of a referenced image

use tokio::fs;

use super::reference::ImageReference;
use crate::error::FetchError;

/// Read all bytes behind `reference`
pub async fn fetch_bytes(reference: &ImageReference) -> Result<Vec<u8>, FetchError> {
    let path = reference.resolve()?;

    fs::read(&path).await.map_err(|e| FetchError::Read {
        path,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bytes.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let bytes = fetch_bytes(&ImageReference::from_path(&path)).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jpg");

        let result = fetch_bytes(&ImageReference::from_path(&path)).await;
        assert!(matches!(result, Err(FetchError::Read { path: p, .. }) if p == path));
    }
}
