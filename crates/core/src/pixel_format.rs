//! Source pixel formats as delivered by the image decoder, and the byte sizes
//! they occupy in a packed buffer.

use serde::Serialize;

use crate::gl_enums as gl;

/// Pixel layout of a decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// One byte per texel.
    Luminance,
    Rgb24,
    Bgr24,
    Rgba32,
    Bgra32,
    /// S3TC, 8 bytes per 4x4 block.
    Dxt1,
    Dxt3,
    Dxt5,
    Bc6hSigned,
    Bc6hUnsigned,
    Bc7,
    /// Two-channel normal map compression (3Dc / RGTC2).
    Ati2,
}

impl PixelFormat {
    /// True for block-compressed formats.
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            PixelFormat::Dxt1
                | PixelFormat::Dxt3
                | PixelFormat::Dxt5
                | PixelFormat::Bc6hSigned
                | PixelFormat::Bc6hUnsigned
                | PixelFormat::Bc7
                | PixelFormat::Ati2
        )
    }

    /// True for the BPTC family, which needs explicit device support.
    pub fn is_bptc(self) -> bool {
        matches!(
            self,
            PixelFormat::Bc6hSigned | PixelFormat::Bc6hUnsigned | PixelFormat::Bc7
        )
    }

    /// Bytes per texel for uncompressed formats.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            PixelFormat::Luminance => Some(1),
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => Some(3),
            PixelFormat::Rgba32 | PixelFormat::Bgra32 => Some(4),
            _ => None,
        }
    }

    /// Device transfer format used when uploading raw texels of this layout.
    pub fn transfer_format(self) -> TransferFormat {
        match self {
            PixelFormat::Luminance => TransferFormat::Luminance,
            PixelFormat::Rgb24 => TransferFormat::Rgb,
            PixelFormat::Bgr24 => TransferFormat::Bgr,
            PixelFormat::Bgra32 => TransferFormat::Bgra,
            _ => TransferFormat::Rgba,
        }
    }
}

/// Packed byte size of a `width x height x depth` image in `format`.
///
/// Depth is treated as at least 1. Block-compressed formats round each axis up
/// to whole 4x4 blocks.
pub fn image_size(format: PixelFormat, width: u32, height: u32, depth: u32) -> usize {
    let (w, h, d) = (width as usize, height as usize, depth.max(1) as usize);
    let blocks = w.div_ceil(4) * h.div_ceil(4);
    match format {
        PixelFormat::Luminance => w * h * d,
        PixelFormat::Rgb24 | PixelFormat::Bgr24 => w * h * d * 3,
        PixelFormat::Rgba32 | PixelFormat::Bgra32 => w * h * d * 4,
        PixelFormat::Dxt1 => blocks * 8 * d,
        PixelFormat::Dxt3
        | PixelFormat::Dxt5
        | PixelFormat::Bc6hSigned
        | PixelFormat::Bc6hUnsigned
        | PixelFormat::Bc7
        | PixelFormat::Ati2 => blocks * 16 * d,
    }
}

/// Component type of raw texel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    UnsignedByte,
    HalfFloat,
    Float,
}

impl DataType {
    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            DataType::UnsignedByte => 1,
            DataType::HalfFloat => 2,
            DataType::Float => 4,
        }
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            DataType::UnsignedByte => gl::UNSIGNED_BYTE,
            DataType::HalfFloat => gl::HALF_FLOAT,
            DataType::Float => gl::FLOAT,
        }
    }
}

/// Channel layout of raw texel data handed to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferFormat {
    Luminance,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    DepthComponent,
}

impl TransferFormat {
    pub fn gl_enum(self) -> u32 {
        match self {
            TransferFormat::Luminance => gl::LUMINANCE,
            TransferFormat::Rgb => gl::RGB,
            TransferFormat::Bgr => gl::BGR,
            TransferFormat::Rgba => gl::RGBA,
            TransferFormat::Bgra => gl::BGRA,
            TransferFormat::DepthComponent => gl::DEPTH_COMPONENT,
        }
    }
}

/// How the color data of a compressed image was encoded by the asset tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeMethod {
    #[default]
    Default,
    YCoCg,
    NormalOrtho,
    NormalStereo,
    NormalParaboloid,
    NormalQuartic,
    NormalAzimuthal,
}

impl EncodeMethod {
    /// Fixed-width label used by the texture list.
    pub fn label(self) -> &'static str {
        match self {
            EncodeMethod::Default => "default   ",
            EncodeMethod::YCoCg => "YCoCg     ",
            EncodeMethod::NormalOrtho => "ortho     ",
            EncodeMethod::NormalStereo => "stereo    ",
            EncodeMethod::NormalParaboloid => "parabolic ",
            EncodeMethod::NormalQuartic => "quartic   ",
            EncodeMethod::NormalAzimuthal => "azimuthal ",
        }
    }
}
