//! Decoded source images as handed to the registry.

use serde::Serialize;

use crate::error::TextureError;
use crate::flags::ImageFlags;
use crate::pixel_format::{image_size, EncodeMethod, PixelFormat};

/// A decoded image: one packed buffer holding every side, layer and
/// (for pre-mipped sources) mip level back to back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceImage {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    /// Volume slices or array layers; 0 and 1 both mean a single layer.
    pub depth: u32,
    /// Mip levels present in `buffer`; 0 for images without a chain.
    pub mip_count: u32,
    /// Pixel data, or `None` to allocate storage without contents.
    #[serde(skip)]
    pub buffer: Option<Vec<u8>>,
    /// Declared total size of `buffer` in bytes.
    pub size: usize,
    pub flags: ImageFlags,
    pub encode: EncodeMethod,
    /// Passed through to the texture record untouched.
    pub fog_params: [f32; 4],
}

impl SourceImage {
    /// A single-level RGBA8 image owning `pixels`.
    pub fn rgba8(width: u32, height: u32, pixels: Vec<u8>, flags: ImageFlags) -> Self {
        Self {
            format: PixelFormat::Rgba32,
            width,
            height,
            depth: 1,
            mip_count: 1,
            size: pixels.len(),
            buffer: Some(pixels),
            flags,
            encode: EncodeMethod::Default,
            fog_params: [0.0; 4],
        }
    }

    /// An image with no pixel data, used to allocate empty storage.
    pub fn empty(format: PixelFormat, width: u32, height: u32, depth: u32) -> Self {
        Self {
            format,
            width,
            height,
            depth,
            mip_count: 0,
            buffer: None,
            size: image_size(format, width, height, depth),
            flags: ImageFlags::empty(),
            encode: EncodeMethod::Default,
            fog_params: [0.0; 4],
        }
    }

    pub fn has_data(&self) -> bool {
        self.buffer.is_some()
    }

    /// Bytes the pipeline may read: the declared size, limited by what the
    /// buffer actually holds.
    pub fn readable_len(&self) -> usize {
        self.buffer
            .as_ref()
            .map_or(0, |buffer| buffer.len().min(self.size))
    }
}

/// Applies a light gamma curve to every color channel of an RGBA8 image:
/// `255 * (c / 255) ^ (1 / gamma)`. Alpha is unchanged.
pub fn apply_light_gamma(image: &mut SourceImage, gamma: f32) -> Result<(), TextureError> {
    if image.format != PixelFormat::Rgba32 && image.format != PixelFormat::Bgra32 {
        return Err(TextureError::InvalidImage(format!(
            "light gamma needs 32-bit color, got {:?}",
            image.format
        )));
    }
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(TextureError::InvalidImage(format!(
            "light gamma must be positive, got {gamma}"
        )));
    }

    let exponent = 1.0 / gamma;
    let mut table = [0u8; 256];
    for (c, entry) in table.iter_mut().enumerate() {
        let value = 255.0 * (c as f32 / 255.0).powf(exponent);
        *entry = value.round().clamp(0.0, 255.0) as u8;
    }

    let readable = image.readable_len();
    if let Some(buffer) = image.buffer.as_mut() {
        for texel in buffer[..readable].chunks_exact_mut(4) {
            for c in &mut texel[..3] {
                *c = table[usize::from(*c)];
            }
        }
    }
    Ok(())
}
