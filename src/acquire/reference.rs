//! Opaque handle to a picked image
//!
//! References are URI strings so they can be shown, logged and compared
//! without touching the filesystem. Only `file://` URIs and plain paths
//! resolve to something we can read.

use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` reference; relative paths are kept as-is
    pub fn from_path(path: &Path) -> Self {
        match Url::from_file_path(path) {
            Ok(url) => Self::new(url),
            Err(()) => Self::new(path.display().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to a local file path
    pub fn resolve(&self) -> Result<PathBuf, FetchError> {
        let unsupported = || FetchError::UnsupportedReference(self.0.clone());

        if self.0.trim().is_empty() {
            return Err(unsupported());
        }

        match Url::parse(&self.0) {
            Ok(url) if url.scheme() == "file" => url.to_file_path().map_err(|()| unsupported()),
            // "C:\photos\cat.jpg" parses as a URL with scheme "c"
            Ok(url) if url.scheme().len() == 1 => Ok(PathBuf::from(&self.0)),
            Ok(_) => Err(unsupported()),
            Err(_) => Ok(PathBuf::from(&self.0)),
        }
    }

    /// Last path segment, for display
    pub fn file_name(&self) -> String {
        self.resolve()
            .ok()
            .and_then(|path| path.file_name().map(|name| name.to_string_lossy().to_string()))
            .unwrap_or_else(|| self.0.clone())
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
