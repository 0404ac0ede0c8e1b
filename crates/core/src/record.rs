//! Registry slot contents.

use serde::Serialize;

use crate::dimensions::Extent;
use crate::flags::TextureFlags;
use crate::format::InternalFormat;
use crate::image::SourceImage;
use crate::pixel_format::EncodeMethod;
use crate::sampler::SamplerState;
use crate::target::TextureTarget;

/// One texture slot. `handle` always equals the slot index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextureRecord {
    pub handle: usize,
    pub name: String,
    pub target: TextureTarget,
    pub internal_format: InternalFormat,
    /// Image dimensions before clamping.
    pub source_width: u32,
    pub source_height: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Resident levels per side.
    pub mip_count: u32,
    /// Resident bytes across every side and level.
    pub byte_size: usize,
    pub flags: TextureFlags,
    pub encode: EncodeMethod,
    pub fog_params: [f32; 4],
    /// Copy of the source image kept for reprocessing (`KEEP_SOURCE`).
    #[serde(skip)]
    pub original: Option<SourceImage>,
    /// Sampler state last applied to the device.
    pub sampler: Option<SamplerState>,
    pub used: bool,
}

impl TextureRecord {
    /// A zeroed, used record for `handle`.
    pub fn fresh(handle: usize, name: &str, flags: TextureFlags) -> Self {
        Self {
            handle,
            name: name.to_owned(),
            flags,
            depth: 1,
            used: true,
            ..Self::default()
        }
    }

    /// A zeroed, free record for `handle`.
    pub fn free(handle: usize) -> Self {
        Self {
            handle,
            ..Self::default()
        }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height, self.depth)
    }

    pub fn side_count(&self) -> usize {
        if self.target == TextureTarget::TextureCube {
            6
        } else {
            self.flags.side_count()
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.flags.contains(TextureFlags::UPLOADED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_is_used_and_zeroed() {
        let record = TextureRecord::fresh(5, "wall", TextureFlags::CLAMP);
        assert!(record.used);
        assert_eq!(record.handle, 5);
        assert_eq!(record.byte_size, 0);
        assert_eq!(record.depth, 1);
        assert_eq!(record.target, TextureTarget::None);
        assert!(!record.is_uploaded());
    }

    #[test]
    fn free_record_keeps_its_handle() {
        let record = TextureRecord::free(9);
        assert!(!record.used);
        assert_eq!(record.handle, 9);
        assert!(record.name.is_empty());
    }

    #[test]
    fn cube_target_has_six_sides() {
        let record = TextureRecord {
            target: TextureTarget::TextureCube,
            ..TextureRecord::fresh(1, "sky", TextureFlags::empty())
        };
        assert_eq!(record.side_count(), 6);
    }
}
