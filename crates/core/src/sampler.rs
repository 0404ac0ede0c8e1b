//! Sampler state derived from a texture's flags, its mip chain and the
//! renderer settings.

use serde::Serialize;

use crate::caps::{DeviceCaps, DeviceFeatures};
use crate::flags::TextureFlags;
use crate::gl_enums as gl;
use crate::settings::TextureSettings;
use crate::target::TextureTarget;

/// Border color used with [`WrapMode::ClampToBorder`].
pub const BORDER_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapLinear,
}

impl MinFilter {
    pub fn gl_enum(self) -> u32 {
        match self {
            MinFilter::Nearest => gl::NEAREST,
            MinFilter::Linear => gl::LINEAR,
            MinFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
            MinFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MagFilter {
    Nearest,
    Linear,
}

impl MagFilter {
    pub fn gl_enum(self) -> u32 {
        match self {
            MagFilter::Nearest => gl::NEAREST,
            MagFilter::Linear => gl::LINEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
    /// Legacy clamp for devices without clamp-to-edge.
    Clamp,
    ClampToBorder,
}

impl WrapMode {
    pub fn gl_enum(self) -> u32 {
        match self {
            WrapMode::Repeat => gl::REPEAT,
            WrapMode::ClampToEdge => gl::CLAMP_TO_EDGE,
            WrapMode::Clamp => gl::CLAMP,
            WrapMode::ClampToBorder => gl::CLAMP_TO_BORDER,
        }
    }
}

/// How a depth texture reads back when sampled without comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthTextureMode {
    Luminance,
    Intensity,
}

impl DepthTextureMode {
    pub fn gl_enum(self) -> u32 {
        match self {
            DepthTextureMode::Luminance => gl::LUMINANCE,
            DepthTextureMode::Intensity => gl::INTENSITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DepthSampling {
    /// Hardware depth comparison (`LEQUAL`).
    pub compare: bool,
    pub mode: DepthTextureMode,
}

/// Complete sampler configuration for one texture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplerState {
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    pub anisotropy: Option<f32>,
    pub lod_bias: Option<f32>,
    pub wrap: WrapMode,
    /// Coordinate axes the wrap mode applies to (S, then T, then R).
    pub wrap_axes: usize,
    pub border_color: Option<[f32; 4]>,
    pub depth: Option<DepthSampling>,
}

/// Drops wrap flags the device cannot honour: border without border support
/// degrades to clamp, and cubemaps without seamless filtering lose border.
pub fn normalize_wrap_flags(
    flags: TextureFlags,
    target: TextureTarget,
    caps: &DeviceCaps,
) -> TextureFlags {
    let mut flags = flags;
    if flags.contains(TextureFlags::BORDER) && !caps.supports(DeviceFeatures::CLAMP_TO_BORDER) {
        flags.remove(TextureFlags::BORDER);
        flags.insert(TextureFlags::CLAMP);
    }
    if target == TextureTarget::TextureCube
        && !caps.supports(DeviceFeatures::SEAMLESS_CUBEMAP)
        && flags.contains(TextureFlags::BORDER)
    {
        flags.remove(TextureFlags::BORDER);
    }
    flags
}

/// Label used by the texture list for the wrap mode a set of flags selects.
pub fn wrap_label(flags: TextureFlags) -> &'static str {
    if flags.contains(TextureFlags::CLAMP) {
        "clamp  "
    } else if flags.contains(TextureFlags::BORDER) {
        "border "
    } else {
        "repeat "
    }
}

fn filters(nearest: bool, mipmapped: bool) -> (MinFilter, MagFilter) {
    match (nearest, mipmapped) {
        (true, true) => (MinFilter::NearestMipmapNearest, MagFilter::Nearest),
        (false, true) => (MinFilter::LinearMipmapLinear, MagFilter::Linear),
        (true, false) => (MinFilter::Nearest, MagFilter::Nearest),
        (false, false) => (MinFilter::Linear, MagFilter::Linear),
    }
}

/// Sampler state for a texture, or `None` for multisample textures, which
/// take no sampler state at all.
///
/// `flags` should already be normalized with [`normalize_wrap_flags`].
pub fn sampler_state(
    flags: TextureFlags,
    target: TextureTarget,
    mip_count: u32,
    settings: &TextureSettings,
    caps: &DeviceCaps,
) -> Option<SamplerState> {
    if flags.contains(TextureFlags::MULTISAMPLE) {
        return None;
    }

    let anisotropy_supported = caps.supports(DeviceFeatures::ANISOTROPY);
    let mipmapped = !flags.contains(TextureFlags::NOMIPMAP) && mip_count > 1;
    let mut depth = None;

    let (min_filter, mag_filter, anisotropy, lod_bias) = if flags.contains(TextureFlags::DEPTHMAP)
    {
        depth = Some(DepthSampling {
            compare: !flags.contains(TextureFlags::NOCOMPARE),
            mode: if flags.contains(TextureFlags::LUMINANCE) {
                DepthTextureMode::Luminance
            } else {
                DepthTextureMode::Intensity
            },
        });
        let (min, mag) = filters(flags.contains(TextureFlags::NEAREST), false);
        (min, mag, anisotropy_supported.then_some(1.0), None)
    } else if !mipmapped {
        let nearest = flags.contains(TextureFlags::NEAREST)
            || (flags.contains(TextureFlags::LIGHTMAP) && settings.lightmap_nearest);
        let (min, mag) = filters(nearest, false);
        (min, mag, None, None)
    } else {
        let nearest = flags.contains(TextureFlags::NEAREST) || settings.texture_nearest;
        let (min, mag) = filters(nearest, true);
        let anisotropy = (anisotropy_supported && !flags.contains(TextureFlags::ALPHA_CONTRAST))
            .then_some(settings.anisotropy);
        let lod_bias = caps
            .supports(DeviceFeatures::LOD_BIAS)
            .then_some(settings.lod_bias);
        (min, mag, anisotropy, lod_bias)
    };

    let wrap = if flags.contains(TextureFlags::BORDER) {
        WrapMode::ClampToBorder
    } else if flags.contains(TextureFlags::CLAMP) {
        if caps.supports(DeviceFeatures::CLAMP_TO_EDGE) {
            WrapMode::ClampToEdge
        } else {
            WrapMode::Clamp
        }
    } else {
        WrapMode::Repeat
    };

    Some(SamplerState {
        min_filter,
        mag_filter,
        anisotropy,
        lod_bias,
        wrap,
        wrap_axes: target.wrap_axes(),
        border_color: (wrap == WrapMode::ClampToBorder).then_some(BORDER_COLOR),
        depth,
    })
}
