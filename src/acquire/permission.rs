//! Photo library access
//!
//! Desktop platforms have no permission prompt, so access is checked by
//! listing the library directory. A denial disables the picker.

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    PhotoLibrary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// No library to check, or the check was inconclusive
    Undetermined,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn allows_picking(self) -> bool {
        self != PermissionStatus::Denied
    }
}

/// Ask for access of the given kind
pub async fn request_permission(kind: PermissionKind, library_dir: Option<PathBuf>) -> PermissionStatus {
    let status = match kind {
        PermissionKind::PhotoLibrary => check_directory(library_dir).await,
    };

    if status == PermissionStatus::Denied {
        warn!("Photo library access denied; picking is disabled");
    } else {
        debug!("Photo library permission: {:?}", status);
    }

    status
}

async fn check_directory(dir: Option<PathBuf>) -> PermissionStatus {
    let Some(dir) = dir else {
        return PermissionStatus::Undetermined;
    };

    match tokio::fs::read_dir(&dir).await {
        Ok(_) => PermissionStatus::Granted,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => PermissionStatus::Denied,
        Err(_) => PermissionStatus::Undetermined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readable_directory_is_granted() {
        let dir = tempfile::tempdir().unwrap();
        let status =
            request_permission(PermissionKind::PhotoLibrary, Some(dir.path().to_path_buf())).await;
        assert_eq!(status, PermissionStatus::Granted);
    }

    #[tokio::test]
    async fn test_missing_directory_is_undetermined() {
        let dir = tempfile::tempdir().unwrap();
        let status =
            request_permission(PermissionKind::PhotoLibrary, Some(dir.path().join("gone"))).await;
        assert_eq!(status, PermissionStatus::Undetermined);
        assert!(status.allows_picking());
    }

    #[tokio::test]
    async fn test_no_library_is_undetermined() {
        let status = request_permission(PermissionKind::PhotoLibrary, None).await;
        assert_eq!(status, PermissionStatus::Undetermined);
    }

    #[test]
    fn test_denied_blocks_picking() {
        assert!(!PermissionStatus::Denied.allows_picking());
        assert!(PermissionStatus::Granted.allows_picking());
    }
}
