//! RGBA -> RGB tensor projection
//!
//! A fixed 4-to-3 stride copy: red, green and blue are kept, alpha is
//! dropped. No resizing, no colour conversion, no normalisation; the model
//! does its own preprocessing.

use super::decode::{Decode, DecodedImage};
use crate::error::TensorError;

/// Channels per pixel in the tensor (R, G, B)
pub const CHANNELS: usize = 3;

/// Channels per pixel coming out of the decoder (R, G, B, A)
const DECODED_CHANNELS: usize = 4;

/// Dense `[height, width, 3]` array of u8 samples in RGB order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelTensor {
    height: usize,
    width: usize,
    data: Vec<u8>,
}

impl PixelTensor {
    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, CHANNELS]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major samples; always `height * width * 3` long
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Decode `raw` and build the RGB tensor from the result
pub fn build_tensor(raw: &[u8], decoder: &dyn Decode) -> Result<PixelTensor, TensorError> {
    let decoded = decoder.decode(raw)?;
    build_tensor_from_decoded(decoded)
}

/// Build the RGB tensor from an already decoded RGBA buffer
///
/// The decoder output is not trusted: its length must equal
/// `width * height * 4`, otherwise nothing is produced.
pub fn build_tensor_from_decoded(decoded: DecodedImage) -> Result<PixelTensor, TensorError> {
    let DecodedImage { width, height, data } = decoded;

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(DECODED_CHANNELS));

    if expected != Some(data.len()) {
        return Err(TensorError::MalformedInput {
            width,
            height,
            expected: expected.unwrap_or(usize::MAX),
            actual: data.len(),
        });
    }

    let pixel_count = data.len() / DECODED_CHANNELS;
    let mut buffer = Vec::with_capacity(pixel_count * CHANNELS);
    for pixel in data.chunks_exact(DECODED_CHANNELS) {
        buffer.extend_from_slice(&pixel[..CHANNELS]);
    }

    Ok(PixelTensor {
        height: height as usize,
        width: width as usize,
        data: buffer,
    })
}
