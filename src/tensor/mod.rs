/// Pixel tensor construction
///
/// This module turns the compressed bytes of a picked photo into the dense
/// `[height, width, 3]` array the classifier consumes:
/// - Decoding JPEG/PNG into interleaved RGBA pixels (decode.rs)
/// - Dropping the alpha channel into an RGB tensor (builder.rs)

pub mod decode;
pub mod builder;

pub use builder::{build_tensor, PixelTensor};
pub use decode::{Decode, ImageDecoder};
