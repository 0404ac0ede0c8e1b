//! PNG import of source images and export of uploaded mip levels.
//!
//! Feature-gated behind `png` (default on) so that embedders that only need
//! synthetic patterns do not pull in the `image` crate.

use std::path::{Path, PathBuf};

use texpipe_core::device::RecordedUpload;
use texpipe_core::error::TextureError;
use texpipe_core::image::SourceImage;

use crate::pixel::rgba_to_source;

/// Decodes a PNG (or any format `image` was built with) into an RGBA8
/// source image with its channel flags analyzed.
pub fn load_png(path: &Path) -> Result<SourceImage, TextureError> {
    let img = image::open(path)
        .map_err(|e| TextureError::Io(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    rgba_to_source(width, height, img.into_raw())
}

/// Writes a packed RGBA8 buffer as a PNG image.
///
/// Returns `TextureError::Io` on a size mismatch or write failure.
pub fn write_rgba_png(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<(), TextureError> {
    let img = image::RgbaImage::from_raw(width, height, pixels.to_vec())
        .ok_or_else(|| TextureError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| TextureError::Io(e.to_string()))
}

/// Writes every uncompressed single-layer RGBA8 upload in `uploads` to
/// `dir` as `{stem}_s{side}_l{level}.png`. Other uploads are skipped.
pub fn write_levels<'a>(
    dir: &Path,
    stem: &str,
    uploads: impl IntoIterator<Item = &'a RecordedUpload>,
) -> Result<Vec<PathBuf>, TextureError> {
    let mut written = Vec::new();
    for upload in uploads {
        let Some(data) = upload.data.as_deref() else {
            continue;
        };
        let rgba_len = upload.width as usize * upload.height as usize * 4;
        if upload.compressed || upload.depth > 1 || data.len() != rgba_len {
            continue;
        }
        let path = dir.join(format!("{stem}_s{}_l{}.png", upload.side, upload.level));
        write_rgba_png(&path, upload.width, upload.height, data)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use texpipe_core::caps::DeviceCaps;
    use texpipe_core::device::RecordingDevice;
    use texpipe_core::flags::{ImageFlags, TextureFlags};
    use texpipe_core::registry::TextureRegistry;
    use texpipe_core::settings::TextureSettings;

    use crate::PatternKind;

    #[test]
    fn write_then_load_round_trip() {
        let image = PatternKind::Cutout.render(16, 8, &json!({})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cutout.png");

        write_rgba_png(&path, 16, 8, image.buffer.as_deref().unwrap()).unwrap();

        let loaded = load_png(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (16, 8));
        assert_eq!(loaded.buffer, image.buffer);
        assert!(loaded.flags.contains(ImageFlags::ONEBIT_ALPHA));
    }

    #[test]
    fn write_rgba_png_rejects_short_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_rgba_png(&dir.path().join("x.png"), 4, 4, &[0; 8]);
        assert!(matches!(result, Err(TextureError::Io(_))));
    }

    #[test]
    fn load_png_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_png(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(TextureError::Io(_))));
    }

    #[test]
    fn write_levels_exports_mip_chain() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let mut registry = TextureRegistry::new(TextureSettings::default());
        let image = PatternKind::Gradient.render(8, 8, &json!({})).unwrap();
        registry
            .load(&mut device, 1, "gradient", image, TextureFlags::empty(), false)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let written = write_levels(dir.path(), "gradient", device.uploads_for(1)).unwrap();

        assert_eq!(written.len(), 4);
        let last = image::open(&written[3]).unwrap().to_rgba8();
        assert_eq!(last.dimensions(), (1, 1));
    }
}
