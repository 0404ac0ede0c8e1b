//! Texture target classification and the capability resolver.
//!
//! [`classify_target`] derives the target an image asks for from its shape and
//! flags; [`resolve_target`] checks that request against the device and either
//! keeps it, falls back (rectangle to 2D) or returns [`TextureTarget::None`].

use std::fmt;

use serde::Serialize;

use crate::caps::{DeviceCaps, DeviceFeatures};
use crate::flags::{ImageFlags, TextureFlags};
use crate::gl_enums as gl;

/// Device binding point of a texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureTarget {
    /// Unresolved, or rejected by the capability check.
    #[default]
    None,
    #[serde(rename = "texture_1d")]
    Texture1D,
    #[serde(rename = "texture_2d")]
    Texture2D,
    #[serde(rename = "texture_3d")]
    Texture3D,
    TextureArray,
    TextureCube,
    TextureRect,
    TextureMultisample,
}

impl TextureTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            TextureTarget::None => 0,
            TextureTarget::Texture1D => gl::TEXTURE_1D,
            TextureTarget::Texture2D => gl::TEXTURE_2D,
            TextureTarget::Texture3D => gl::TEXTURE_3D,
            TextureTarget::TextureArray => gl::TEXTURE_2D_ARRAY,
            TextureTarget::TextureCube => gl::TEXTURE_CUBE_MAP,
            TextureTarget::TextureRect => gl::TEXTURE_RECTANGLE,
            TextureTarget::TextureMultisample => gl::TEXTURE_2D_MULTISAMPLE,
        }
    }

    /// True for targets whose storage is addressed with a depth/layer axis.
    pub fn is_layered(self) -> bool {
        matches!(self, TextureTarget::Texture3D | TextureTarget::TextureArray)
    }

    /// Number of texture coordinate axes that take a wrap mode.
    pub fn wrap_axes(self) -> usize {
        match self {
            TextureTarget::Texture1D => 1,
            TextureTarget::Texture3D | TextureTarget::TextureCube => 3,
            _ => 2,
        }
    }

    /// Fixed-width label used by the texture list.
    pub fn list_label(self) -> &'static str {
        match self {
            TextureTarget::Texture1D => " 1D   ",
            TextureTarget::Texture2D => " 2D   ",
            TextureTarget::Texture3D => " 3D   ",
            TextureTarget::TextureCube => "CUBE  ",
            TextureTarget::TextureRect => "RECT  ",
            TextureTarget::TextureArray => "ARRAY ",
            TextureTarget::TextureMultisample => "MSAA  ",
            TextureTarget::None => "????  ",
        }
    }
}

impl fmt::Display for TextureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureTarget::Texture1D => "1D",
            TextureTarget::Texture2D => "2D",
            TextureTarget::Texture3D => "3D",
            TextureTarget::TextureArray => "Array",
            TextureTarget::TextureCube => "Cube",
            TextureTarget::TextureRect => "Rect",
            TextureTarget::TextureMultisample => "2D Multisample",
            TextureTarget::None => "??",
        };
        f.write_str(name)
    }
}

/// Picks the target an image of this shape asks for. First match wins.
pub fn classify_target(
    width: u32,
    height: u32,
    depth: u32,
    image_flags: ImageFlags,
    flags: TextureFlags,
) -> TextureTarget {
    if width > 1 && height <= 1 {
        TextureTarget::Texture1D
    } else if image_flags.contains(ImageFlags::CUBEMAP) {
        TextureTarget::TextureCube
    } else if image_flags.contains(ImageFlags::MULTILAYER) {
        TextureTarget::TextureArray
    } else if width > 1 && height > 1 && depth > 1 {
        TextureTarget::Texture3D
    } else if flags.contains(TextureFlags::RECTANGLE) {
        TextureTarget::TextureRect
    } else if flags.contains(TextureFlags::MULTISAMPLE) {
        TextureTarget::TextureMultisample
    } else {
        TextureTarget::Texture2D
    }
}

/// Checks a requested target against the device.
///
/// Returns the requested target, `Texture2D` for an unsupported rectangle, or
/// `TextureTarget::None` when the texture cannot be created at all.
pub fn resolve_target(
    requested: TextureTarget,
    flags: TextureFlags,
    caps: &DeviceCaps,
) -> TextureTarget {
    let mut target = requested;

    let required = match target {
        TextureTarget::TextureCube => Some(DeviceFeatures::CUBEMAP),
        TextureTarget::TextureArray => Some(DeviceFeatures::ARRAY),
        TextureTarget::Texture3D => Some(DeviceFeatures::TEXTURE_3D),
        TextureTarget::TextureMultisample => Some(DeviceFeatures::MULTISAMPLE),
        _ => None,
    };
    if required.is_some_and(|feature| !caps.supports(feature)) {
        target = TextureTarget::None;
    }

    if target == TextureTarget::TextureRect && !caps.supports(DeviceFeatures::RECTANGLE) {
        target = TextureTarget::Texture2D;
    }

    if flags.contains(TextureFlags::DEPTHMAP) {
        if !caps.supports(DeviceFeatures::DEPTH_TEXTURE) {
            target = TextureTarget::None;
        }
        if target == TextureTarget::TextureCube && !caps.supports(DeviceFeatures::GPU_SHADER4) {
            target = TextureTarget::None;
        }
    }

    target
}
