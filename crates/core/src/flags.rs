//! Typed flag sets for textures and source images.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Semantic properties of a texture record.
    ///
    /// Set by the caller on creation, extended by image preparation, and
    /// consulted by every stage of the upload pipeline.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct TextureFlags: u32 {
        /// Upload only the base level.
        const NOMIPMAP = 1 << 0;
        /// Clamp texture coordinates to the edge.
        const CLAMP = 1 << 1;
        /// Clamp texture coordinates to a black border.
        const BORDER = 1 << 2;
        /// Point sampling.
        const NEAREST = 1 << 3;
        /// Texels encode surface normals; filtering is vector aware.
        const NORMALMAP = 1 << 4;
        /// Depth texture (shadow maps).
        const DEPTHMAP = 1 << 5;
        /// 32-bit floating point storage.
        const FLOAT = 1 << 6;
        /// 16-bit half-float storage.
        const HALF_FLOAT = 1 << 7;
        /// Retain a copy of the source image for later reprocessing.
        const KEEP_SOURCE = 1 << 8;
        /// Storage has been defined on the device; later uploads update it.
        const UPLOADED = 1 << 9;
        /// Multisampled render target.
        const MULTISAMPLE = 1 << 10;
        /// Single channel used as intensity rather than luminance.
        const ALPHA_CONTRAST = 1 << 11;
        /// Always upload with color channels, even for gray images.
        const FORCE_COLOR = 1 << 12;
        /// Six-face cubemap.
        const CUBEMAP = 1 << 13;
        /// Layered 2D array.
        const ARRAY = 1 << 14;
        /// Volume texture.
        const TEXTURE_3D = 1 << 15;
        /// Rectangle target with unnormalized coordinates.
        const RECTANGLE = 1 << 16;
        /// Drop color channels and store luminance only.
        const LUMINANCE = 1 << 17;
        /// The source image carried an alpha channel.
        const HAS_ALPHA = 1 << 18;
        /// The source image carried fullbright (luma) texels.
        const HAS_LUMA = 1 << 19;
        /// Depth maps without hardware comparison.
        const NOCOMPARE = 1 << 20;
        /// Lightmap atlas page; honours the lightmap filtering preference.
        const LIGHTMAP = 1 << 21;
        /// Request to update an existing texture rather than create one.
        const UPDATE = 1 << 22;
    }
}

bitflags! {
    /// Properties reported by the image source for a decoded image.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ImageFlags: u32 {
        /// At least one texel is not gray.
        const HAS_COLOR = 1 << 0;
        /// At least one texel is not fully opaque.
        const HAS_ALPHA = 1 << 1;
        /// Buffer holds six faces back to back.
        const CUBEMAP = 1 << 2;
        /// Buffer holds `depth` layers of a 2D array.
        const MULTILAYER = 1 << 3;
        /// Alpha is either 0 or 255.
        const ONEBIT_ALPHA = 1 << 4;
        /// Image contains fullbright texels.
        const HAS_LUMA = 1 << 5;
    }
}

impl TextureFlags {
    /// Number of faces stored for a texture with these flags.
    pub fn side_count(self) -> usize {
        if self.contains(TextureFlags::CUBEMAP) {
            6
        } else {
            1
        }
    }
}

impl ImageFlags {
    /// Effective channel count for this mask: 4 (color + alpha), 3 (color),
    /// 2 (alpha only) or 1.
    pub fn channel_count(self) -> u32 {
        match (
            self.contains(ImageFlags::HAS_COLOR),
            self.contains(ImageFlags::HAS_ALPHA),
        ) {
            (true, true) => 4,
            (true, false) => 3,
            (false, true) => 2,
            (false, false) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_count_covers_all_masks() {
        assert_eq!((ImageFlags::HAS_COLOR | ImageFlags::HAS_ALPHA).channel_count(), 4);
        assert_eq!(ImageFlags::HAS_COLOR.channel_count(), 3);
        assert_eq!(ImageFlags::HAS_ALPHA.channel_count(), 2);
        assert_eq!(ImageFlags::empty().channel_count(), 1);
    }

    #[test]
    fn unrelated_image_flags_do_not_change_channel_count() {
        let flags = ImageFlags::HAS_COLOR | ImageFlags::ONEBIT_ALPHA | ImageFlags::CUBEMAP;
        assert_eq!(flags.channel_count(), 3);
    }

    #[test]
    fn side_count_is_six_for_cubemaps() {
        assert_eq!(TextureFlags::CUBEMAP.side_count(), 6);
        assert_eq!((TextureFlags::CUBEMAP | TextureFlags::CLAMP).side_count(), 6);
        assert_eq!(TextureFlags::NOMIPMAP.side_count(), 1);
    }

    #[test]
    fn texture_flags_parse_from_names() {
        let flags: TextureFlags =
            bitflags::parser::from_str("NOMIPMAP | CLAMP | NORMALMAP").unwrap();
        assert_eq!(
            flags,
            TextureFlags::NOMIPMAP | TextureFlags::CLAMP | TextureFlags::NORMALMAP
        );
    }

    #[test]
    fn default_flags_are_empty() {
        assert!(TextureFlags::default().is_empty());
        assert!(ImageFlags::default().is_empty());
    }
}
