//! Device storage formats and the decision table that picks one for an image.

use serde::Serialize;

use crate::caps::{DeviceCaps, DeviceFeatures, HardwareFamily};
use crate::flags::{ImageFlags, TextureFlags};
use crate::gl_enums as gl;
use crate::pixel_format::{DataType, PixelFormat};

/// GPU-side storage format of a texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalFormat {
    Dxt1,
    Dxt3,
    Dxt5,
    Bc6hSigned,
    Bc6hUnsigned,
    Bc7,
    /// Two-channel normal compression, vendor-neutral encoding.
    Rgtc2,
    /// Two-channel normal compression, Radeon encoding.
    Ati3dc,
    Depth16,
    Depth24,
    Depth32F,
    Luminance16F,
    Luminance32F,
    Rg16F,
    Rg32F,
    Rgb16F,
    Rgb32F,
    Rgba16F,
    Rgba32F,
    Luminance8,
    Intensity8,
    Luminance8Alpha8,
    Rgb5,
    Rgb8,
    /// Driver-chosen RGB precision.
    Rgb,
    Rgba4,
    Rgba8,
    /// Driver-chosen RGBA precision.
    #[default]
    Rgba,
}

impl InternalFormat {
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            InternalFormat::Dxt1
                | InternalFormat::Dxt3
                | InternalFormat::Dxt5
                | InternalFormat::Bc6hSigned
                | InternalFormat::Bc6hUnsigned
                | InternalFormat::Bc7
                | InternalFormat::Rgtc2
                | InternalFormat::Ati3dc
        )
    }

    pub fn is_depth(self) -> bool {
        matches!(
            self,
            InternalFormat::Depth16 | InternalFormat::Depth24 | InternalFormat::Depth32F
        )
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            InternalFormat::Dxt1 => gl::COMPRESSED_RGB_S3TC_DXT1,
            InternalFormat::Dxt3 => gl::COMPRESSED_RGBA_S3TC_DXT3,
            InternalFormat::Dxt5 => gl::COMPRESSED_RGBA_S3TC_DXT5,
            InternalFormat::Bc6hSigned => gl::COMPRESSED_RGB_BPTC_SIGNED_FLOAT,
            InternalFormat::Bc6hUnsigned => gl::COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT,
            InternalFormat::Bc7 => gl::COMPRESSED_RGBA_BPTC_UNORM,
            InternalFormat::Rgtc2 => gl::COMPRESSED_RED_GREEN_RGTC2,
            InternalFormat::Ati3dc => gl::COMPRESSED_LUMINANCE_ALPHA_3DC_ATI,
            InternalFormat::Depth16 => gl::DEPTH_COMPONENT16,
            InternalFormat::Depth24 => gl::DEPTH_COMPONENT24,
            InternalFormat::Depth32F => gl::DEPTH_COMPONENT32F,
            InternalFormat::Luminance16F => gl::LUMINANCE16F,
            InternalFormat::Luminance32F => gl::LUMINANCE32F,
            InternalFormat::Rg16F => gl::RG16F,
            InternalFormat::Rg32F => gl::RG32F,
            InternalFormat::Rgb16F => gl::RGB16F,
            InternalFormat::Rgb32F => gl::RGB32F,
            InternalFormat::Rgba16F => gl::RGBA16F,
            InternalFormat::Rgba32F => gl::RGBA32F,
            InternalFormat::Luminance8 => gl::LUMINANCE8,
            InternalFormat::Intensity8 => gl::INTENSITY8,
            InternalFormat::Luminance8Alpha8 => gl::LUMINANCE8_ALPHA8,
            InternalFormat::Rgb5 => gl::RGB5,
            InternalFormat::Rgb8 => gl::RGB8,
            InternalFormat::Rgb => gl::RGB,
            InternalFormat::Rgba4 => gl::RGBA4,
            InternalFormat::Rgba8 => gl::RGBA8,
            InternalFormat::Rgba => gl::RGBA,
        }
    }

    /// Short label used by the texture list.
    pub fn label(self) -> &'static str {
        match self {
            InternalFormat::Dxt1 => "DXT1c ",
            InternalFormat::Dxt3 => "DXT3  ",
            InternalFormat::Dxt5 => "DXT5  ",
            InternalFormat::Bc6hSigned => "BC6HS ",
            InternalFormat::Bc6hUnsigned => "BC6HU ",
            InternalFormat::Bc7 => "BC7   ",
            InternalFormat::Rgtc2 | InternalFormat::Ati3dc => "ATI2  ",
            InternalFormat::Depth16 => "DPTH16",
            InternalFormat::Depth24 => "DPTH24",
            InternalFormat::Depth32F => "DPTH32",
            InternalFormat::Luminance16F => "L16F  ",
            InternalFormat::Luminance32F => "L32F  ",
            InternalFormat::Rg16F => "RG16F ",
            InternalFormat::Rg32F => "RG32F ",
            InternalFormat::Rgb16F => "RGB16F",
            InternalFormat::Rgb32F => "RGB32F",
            InternalFormat::Rgba16F => "RGBA16F",
            InternalFormat::Rgba32F => "RGBA32F",
            InternalFormat::Luminance8 => "L8    ",
            InternalFormat::Intensity8 => "I8    ",
            InternalFormat::Luminance8Alpha8 => "L8A8  ",
            InternalFormat::Rgb5 => "RGB5  ",
            InternalFormat::Rgb8 => "RGB8  ",
            InternalFormat::Rgb => "RGB   ",
            InternalFormat::Rgba4 => "RGBA4 ",
            InternalFormat::Rgba8 => "RGBA8 ",
            InternalFormat::Rgba => "RGBA  ",
        }
    }
}

/// Resident byte size of a `width x height x depth` level stored as `format`.
pub fn texture_size(format: InternalFormat, width: u32, height: u32, depth: u32) -> usize {
    let (w, h, d) = (width as usize, height as usize, depth.max(1) as usize);
    let texels = w * h * d;
    let blocks = w.div_ceil(4) * h.div_ceil(4) * d;
    match format {
        InternalFormat::Dxt1 => blocks * 8,
        InternalFormat::Dxt3
        | InternalFormat::Dxt5
        | InternalFormat::Bc6hSigned
        | InternalFormat::Bc6hUnsigned
        | InternalFormat::Bc7
        | InternalFormat::Rgtc2
        | InternalFormat::Ati3dc => blocks * 16,
        InternalFormat::Luminance8 | InternalFormat::Intensity8 => texels,
        InternalFormat::Luminance8Alpha8
        | InternalFormat::Depth16
        | InternalFormat::Luminance16F => texels * 2,
        InternalFormat::Rgb5 => texels * 3 / 2,
        InternalFormat::Rgba4 => texels * 4 / 2,
        InternalFormat::Rgb8 | InternalFormat::Rgb | InternalFormat::Depth24 => texels * 3,
        InternalFormat::Rgba8
        | InternalFormat::Rgba
        | InternalFormat::Depth32F
        | InternalFormat::Luminance32F
        | InternalFormat::Rg16F => texels * 4,
        InternalFormat::Rgb16F => texels * 6,
        InternalFormat::Rg32F | InternalFormat::Rgba16F => texels * 8,
        InternalFormat::Rgb32F => texels * 12,
        InternalFormat::Rgba32F => texels * 16,
    }
}

/// Component type used when handing raw texels to the device.
pub fn transfer_data_type(flags: TextureFlags) -> DataType {
    if flags.contains(TextureFlags::HALF_FLOAT) {
        DataType::HalfFloat
    } else if flags.contains(TextureFlags::FLOAT) {
        DataType::Float
    } else {
        DataType::UnsignedByte
    }
}

/// Picks the storage format for an image. Rules are checked in order:
/// block-compressed sources, depth maps, float storage, then fixed point by
/// channel count. Never fails.
pub fn select_format(
    source: PixelFormat,
    image_flags: ImageFlags,
    flags: TextureFlags,
    caps: &DeviceCaps,
) -> InternalFormat {
    if let Some(compressed) = compressed_format(source, caps.hardware) {
        return compressed;
    }

    if flags.contains(TextureFlags::DEPTHMAP) {
        return if flags.contains(TextureFlags::HALF_FLOAT) {
            InternalFormat::Depth16
        } else if flags.contains(TextureFlags::FLOAT) && caps.supports(DeviceFeatures::DEPTH_FLOAT)
        {
            InternalFormat::Depth32F
        } else {
            InternalFormat::Depth24
        };
    }

    let has_color = image_flags.contains(ImageFlags::HAS_COLOR);
    let has_alpha = image_flags.contains(ImageFlags::HAS_ALPHA);

    if flags.intersects(TextureFlags::FLOAT | TextureFlags::HALF_FLOAT)
        && caps.supports(DeviceFeatures::FLOAT_TEXTURE)
    {
        let half = flags.contains(TextureFlags::HALF_FLOAT) || caps.display_bits == 16;
        return match (has_color, has_alpha, half) {
            (true, true, true) => InternalFormat::Rgba16F,
            (true, true, false) => InternalFormat::Rgba32F,
            (true, false, true) => InternalFormat::Rgb16F,
            (true, false, false) => InternalFormat::Rgb32F,
            (false, true, true) => InternalFormat::Rg16F,
            (false, true, false) => InternalFormat::Rg32F,
            (false, false, true) => InternalFormat::Luminance16F,
            (false, false, false) => InternalFormat::Luminance32F,
        };
    }

    match image_flags.channel_count() {
        1 if flags.contains(TextureFlags::ALPHA_CONTRAST) => InternalFormat::Intensity8,
        1 => InternalFormat::Luminance8,
        2 => InternalFormat::Luminance8Alpha8,
        3 => match caps.display_bits {
            16 => InternalFormat::Rgb5,
            32 => InternalFormat::Rgb8,
            _ => InternalFormat::Rgb,
        },
        _ => match caps.display_bits {
            16 => InternalFormat::Rgba4,
            32 => InternalFormat::Rgba8,
            _ => InternalFormat::Rgba,
        },
    }
}

fn compressed_format(source: PixelFormat, hardware: HardwareFamily) -> Option<InternalFormat> {
    let format = match source {
        // DXT1 is always treated as opaque.
        PixelFormat::Dxt1 => InternalFormat::Dxt1,
        PixelFormat::Dxt3 => InternalFormat::Dxt3,
        PixelFormat::Dxt5 => InternalFormat::Dxt5,
        PixelFormat::Bc6hSigned => InternalFormat::Bc6hSigned,
        PixelFormat::Bc6hUnsigned => InternalFormat::Bc6hUnsigned,
        PixelFormat::Bc7 => InternalFormat::Bc7,
        PixelFormat::Ati2 => match hardware {
            HardwareFamily::Radeon => InternalFormat::Ati3dc,
            HardwareFamily::Generic => InternalFormat::Rgtc2,
        },
        PixelFormat::Luminance
        | PixelFormat::Rgb24
        | PixelFormat::Bgr24
        | PixelFormat::Rgba32
        | PixelFormat::Bgra32 => return None,
    };
    Some(format)
}
