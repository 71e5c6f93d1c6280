/// Image acquisition module
///
/// This module covers everything between "the user taps" and "we hold the
/// bytes of a photo":
/// - Image references and resolving them to files (reference.rs)
/// - The native file picker (picker.rs)
/// - Photo library access probing (permission.rs)
/// - Reading the referenced bytes (fetch.rs)

pub mod reference;
pub mod picker;
pub mod permission;
pub mod fetch;

pub use fetch::fetch_bytes;
pub use permission::{request_permission, PermissionKind, PermissionStatus};
pub use picker::{pick_image, PickOptions, PickOutcome};
pub use reference::ImageReference;
