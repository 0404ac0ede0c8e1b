//! Error types for texture registry and upload operations.

use thiserror::Error;

use crate::pixel_format::PixelFormat;
use crate::target::TextureTarget;
use crate::upload::UploadStage;

/// Errors produced by registry and upload operations.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The requested target is not available on the device (or the depth/cubemap
    /// combination is not allowed). The upload was skipped.
    #[error("{name}: {requested} target is not supported by the device")]
    UnsupportedTarget {
        name: String,
        requested: TextureTarget,
    },

    /// A BC6H/BC7 compressed image was supplied to a device without BPTC support.
    #[error("{name}: compressed format {format:?} is not supported by the device")]
    UnsupportedCompressionFormat { name: String, format: PixelFormat },

    /// The per-level sizes of the image run past its declared total size.
    #[error(
        "{name}: image buffer overrun at {stage} (needs {needed} bytes, {available} available)"
    )]
    SourceBufferOverrun {
        name: String,
        stage: UploadStage,
        needed: usize,
        available: usize,
    },

    /// A handle outside `[0, capacity)` was passed to the registry.
    #[error("invalid texture handle {handle} (capacity {capacity})")]
    InvalidHandle { handle: usize, capacity: usize },

    /// An update was requested for a slot that holds no texture.
    #[error("no texture loaded at handle {handle} to update")]
    NotLoaded { handle: usize },

    /// The device reported an error after a storage call.
    #[error("device error 0x{code:04X} while uploading {name} [{target}]")]
    DeviceUpload {
        name: String,
        target: TextureTarget,
        code: u32,
    },

    /// Width, height or depth was zero where a real image was required.
    #[error("invalid dimensions: width, height and depth must be non-zero")]
    InvalidDimensions,

    /// The image data cannot be processed by the pipeline as given.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A retained original could not be reprocessed.
    #[error("cannot reprocess {name}: {reason}")]
    Reprocess { name: String, reason: String },

    /// The requested synthetic pattern name is not recognized.
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),

    /// Reading or writing image files failed.
    #[error("I/O error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_target_names_texture_and_target() {
        let err = TextureError::UnsupportedTarget {
            name: "sky_cube".into(),
            requested: TextureTarget::TextureCube,
        };
        let msg = format!("{err}");
        assert!(msg.contains("sky_cube"), "missing name in: {msg}");
        assert!(msg.contains("Cube"), "missing target in: {msg}");
    }

    #[test]
    fn overrun_includes_sizes() {
        let err = TextureError::SourceBufferOverrun {
            name: "wall".into(),
            stage: UploadStage::Uploading { side: 0, level: 2 },
            needed: 4096,
            available: 1024,
        };
        let msg = format!("{err}");
        assert!(msg.contains("wall"), "missing name in: {msg}");
        assert!(msg.contains("4096"), "missing needed size in: {msg}");
        assert!(msg.contains("1024"), "missing available size in: {msg}");
        assert!(msg.contains("level 2"), "missing stage in: {msg}");
    }

    #[test]
    fn invalid_handle_includes_handle_and_capacity() {
        let err = TextureError::InvalidHandle {
            handle: 70,
            capacity: 64,
        };
        let msg = format!("{err}");
        assert!(msg.contains("70"), "missing handle in: {msg}");
        assert!(msg.contains("64"), "missing capacity in: {msg}");
    }

    #[test]
    fn device_upload_formats_code_as_hex() {
        let err = TextureError::DeviceUpload {
            name: "lightmap_0".into(),
            target: TextureTarget::Texture2D,
            code: 0x0501,
        };
        let msg = format!("{err}");
        assert!(msg.contains("0x0501"), "missing code in: {msg}");
        assert!(msg.contains("lightmap_0"), "missing name in: {msg}");
        assert!(msg.contains("2D"), "missing target in: {msg}");
    }

    #[test]
    fn reprocess_includes_reason() {
        let err = TextureError::Reprocess {
            name: "player".into(),
            reason: "no retained original".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("no retained original"), "missing reason in: {msg}");
    }

    #[test]
    fn texture_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TextureError>();
    }

    #[test]
    fn texture_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<TextureError>();
    }
}
