//! Conversion of packed RGBA8 pixels into [`SourceImage`]s.
//!
//! Always available (no feature gate) so that synthetic patterns and PNG
//! loading share the same channel analysis.

use texpipe_core::error::TextureError;
use texpipe_core::flags::ImageFlags;
use texpipe_core::image::SourceImage;

/// Channel flags for a packed RGBA8 buffer.
///
/// Color is present when any texel is not grey; alpha when any texel is not
/// fully opaque. Alpha made only of 0 and 255 is also one-bit.
pub fn analyze_channels(pixels: &[u8]) -> ImageFlags {
    let mut flags = ImageFlags::empty();
    let mut one_bit = true;

    for texel in pixels.chunks_exact(4) {
        if texel[0] != texel[1] || texel[1] != texel[2] {
            flags.insert(ImageFlags::HAS_COLOR);
        }
        match texel[3] {
            255 => {}
            0 => flags.insert(ImageFlags::HAS_ALPHA),
            _ => {
                flags.insert(ImageFlags::HAS_ALPHA);
                one_bit = false;
            }
        }
    }

    if one_bit && flags.contains(ImageFlags::HAS_ALPHA) {
        flags.insert(ImageFlags::ONEBIT_ALPHA);
    }
    flags
}

/// Wraps a `width x height` RGBA8 buffer as a single-level source image.
///
/// Returns `TextureError::InvalidDimensions` for a zero dimension and
/// `TextureError::InvalidImage` when the buffer length does not match.
pub fn rgba_to_source(width: u32, height: u32, pixels: Vec<u8>) -> Result<SourceImage, TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::InvalidDimensions);
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(TextureError::InvalidImage(format!(
            "{width}x{height} RGBA needs {expected} bytes, got {}",
            pixels.len()
        )));
    }
    let flags = analyze_channels(&pixels);
    Ok(SourceImage::rgba8(width, height, pixels, flags))
}
