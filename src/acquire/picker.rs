//! Native image picker
//!
//! Desktop pickers have no crop/edit step, so the selection is passed on
//! untouched.

use std::path::{Path, PathBuf};

use rfd::AsyncFileDialog;

use super::reference::ImageReference;
use crate::config::PickerConfig;

/// No editing/aspect options: rfd has no crop step, so the picked file is used as-is
#[derive(Debug, Clone, PartialEq)]
pub struct PickOptions {
    pub title: String,
    /// Folder the dialog opens in
    pub directory: Option<PathBuf>,
    /// Extensions accepted by the filter, without dots
    pub extensions: Vec<String>,
}

impl From<&PickerConfig> for PickOptions {
    fn from(config: &PickerConfig) -> Self {
        Self {
            title: "Choose an image to classify".to_string(),
            directory: config.library_dir.clone(),
            extensions: config.extensions.clone(),
        }
    }
}

/// Result of one picker interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Cancelled,
    Picked(ImageReference),
}

impl PickOutcome {
    fn from_selection(path: Option<&Path>) -> Self {
        match path {
            Some(path) => PickOutcome::Picked(ImageReference::from_path(path)),
            None => PickOutcome::Cancelled,
        }
    }
}

/// Show the picker and wait for the user
pub async fn pick_image(options: PickOptions) -> PickOutcome {
    let mut dialog = AsyncFileDialog::new()
        .set_title(options.title.as_str())
        .add_filter("Images", options.extensions.as_slice());

    if let Some(directory) = &options.directory {
        dialog = dialog.set_directory(directory);
    }

    let handle = dialog.pick_file().await;
    PickOutcome::from_selection(handle.as_ref().map(|h| h.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_follow_config() {
        let config = PickerConfig {
            library_dir: Some(PathBuf::from("/photos")),
            extensions: vec!["jpg".into()],
        };

        let options = PickOptions::from(&config);

        assert_eq!(options.directory, Some(PathBuf::from("/photos")));
        assert_eq!(options.extensions, vec!["jpg".to_string()]);
    }

    #[test]
    fn test_no_selection_is_cancelled() {
        assert_eq!(PickOutcome::from_selection(None), PickOutcome::Cancelled);
    }

    #[cfg(unix)]
    #[test]
    fn test_selection_becomes_file_reference() {
        let outcome = PickOutcome::from_selection(Some(Path::new("/photos/cat.jpg")));
        assert_eq!(
            outcome,
            PickOutcome::Picked(ImageReference::new("file:///photos/cat.jpg"))
        );
    }
}
