#![deny(unsafe_code)]
//! Texture registry and upload pipeline for GL-class renderers.
//!
//! Takes decoded images of any supported pixel format, resolves the device
//! target, storage format and clamped dimensions, resamples and generates mip
//! levels, and commits every side and level through a [`TextureDevice`].
//! [`TextureRegistry`] tracks the resulting records by handle.

pub mod caps;
pub mod device;
pub mod dimensions;
pub mod edge_filter;
pub mod error;
pub mod flags;
pub mod format;
pub mod gl_enums;
pub mod image;
pub mod mipmap;
pub mod pixel_format;
pub mod record;
pub mod registry;
pub mod report;
pub mod resample;
pub mod sampler;
pub mod settings;
pub mod target;
pub mod upload;

#[cfg(feature = "render")]
pub mod render;

pub use caps::{DeviceCaps, DeviceFeatures, DeviceLimits, HardwareFamily};
pub use device::{RecordingDevice, TextureDevice, UploadCommand};
pub use dimensions::Extent;
pub use error::TextureError;
pub use flags::{ImageFlags, TextureFlags};
pub use format::InternalFormat;
pub use image::SourceImage;
pub use pixel_format::{EncodeMethod, PixelFormat};
pub use record::TextureRecord;
pub use registry::{TextureRegistry, MAX_TEXTURES};
pub use report::TextureListReport;
pub use settings::TextureSettings;
pub use target::TextureTarget;
pub use upload::UploadStage;
