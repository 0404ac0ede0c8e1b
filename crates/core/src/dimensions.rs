//! Fitting requested texture dimensions to what the device can allocate.

use serde::Serialize;

use crate::caps::DeviceLimits;
use crate::target::TextureTarget;

/// Width, height and depth (or layer count) of a texture or mip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Dimensions of mip `level`, each axis halved per level and floored at 1.
    /// Depth is not reduced.
    pub fn mip(self, level: u32) -> Extent {
        Extent {
            width: (self.width >> level.min(31)).max(1),
            height: (self.height >> level.min(31)).max(1),
            depth: self.depth.max(1),
        }
    }
}

/// Maximum edge length and maximum depth for `target`.
fn target_limits(target: TextureTarget, limits: &DeviceLimits) -> (u32, u32) {
    match target {
        TextureTarget::TextureArray => (limits.max_2d_size, limits.max_array_layers),
        TextureTarget::TextureRect => (limits.max_rectangle_size, 1),
        TextureTarget::TextureCube => (limits.max_cubemap_size, 1),
        TextureTarget::Texture3D => (limits.max_3d_size, limits.max_3d_size),
        TextureTarget::Texture1D
        | TextureTarget::Texture2D
        | TextureTarget::TextureMultisample
        | TextureTarget::None => (limits.max_2d_size, 1),
    }
}

/// Rounds `size` up to a power of two, then optionally back down one step.
///
/// `round_down` 0 never rounds down, 1 always does when `size` was not already
/// a power of two, and `n > 1` rounds down only when the gap to the upper power
/// exceeds `upper >> n`.
pub fn round_to_power_of_two(size: u32, round_down: u32) -> u32 {
    let mut scaled = size.checked_next_power_of_two().unwrap_or(1 << 31);
    if scaled < size {
        return scaled;
    }

    let gap = scaled - size;
    if round_down > 0
        && size < scaled
        && (round_down == 1 || gap > scaled.checked_shr(round_down).unwrap_or(0))
    {
        scaled >>= 1;
    }
    scaled
}

/// Computes the allocated dimensions of a texture.
///
/// On devices without non-power-of-two support width and height are first
/// rounded with [`round_to_power_of_two`]. Then, while any axis exceeds the
/// target's limit, axes are halved: width only for 1D, all three axes for
/// volumes and arrays, width and height otherwise. Every axis ends up at
/// least 1.
pub fn clamp_dimensions(
    target: TextureTarget,
    width: u32,
    height: u32,
    depth: u32,
    limits: &DeviceLimits,
    npot: bool,
    round_down: u32,
) -> Extent {
    let (max_size, max_depth) = target_limits(target, limits);
    let (mut width, mut height, mut depth) = (width, height, depth);

    if !npot {
        width = round_to_power_of_two(width, round_down);
        height = round_to_power_of_two(height, round_down);
    }

    if width > max_size || height > max_size || depth > max_depth {
        match target {
            TextureTarget::Texture1D => {
                while width > max_size {
                    width >>= 1;
                }
            }
            TextureTarget::Texture3D | TextureTarget::TextureArray => {
                while width > max_size || height > max_size || depth > max_depth {
                    width >>= 1;
                    height >>= 1;
                    depth >>= 1;
                }
            }
            _ => {
                while width > max_size || height > max_size {
                    width >>= 1;
                    height >>= 1;
                }
            }
        }
    }

    Extent::new(width.max(1), height.max(1), depth.max(1))
}
