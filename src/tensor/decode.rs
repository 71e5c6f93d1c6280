//! Decode capability: compressed image bytes -> RGBA pixels
//!
//! The builder only depends on the `Decode` trait so tests can hand it
//! decoder output that lies about its own dimensions.

use crate::error::TensorError;

/// Output of a decoder: interleaved RGBA, one byte per channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Expected to hold `width * height * 4` bytes
    pub data: Vec<u8>,
}

/// Anything that can turn compressed bytes into RGBA pixels
pub trait Decode: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, TensorError>;
}

/// Decoder backed by the `image` crate
///
/// The format is sniffed from the bytes, so JPEG, PNG and the other formats
/// enabled in `image` all work. Output is always 8-bit RGBA.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl Decode for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, TensorError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| TensorError::Decode(e.to_string()))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(DecodedImage {
            width,
            height,
            data: rgba.into_raw(),
        })
    }
}
