//! GL context wrapper implementing [`TextureDevice`].
//!
//! `GlDevice` owns a `glow::Context`, detects the texture features and limits
//! of the driver once at creation, and maps registry handles to GL texture
//! objects.

use std::collections::HashMap;

use glow::HasContext;

use crate::caps::{DeviceCaps, DeviceFeatures, DeviceLimits, HardwareFamily};
use crate::device::{TextureDevice, UploadCommand};
use crate::gl_enums as gl;
use crate::sampler::SamplerState;
use crate::target::TextureTarget;

use super::texture::{apply_sampler, upload_level};

/// Features that are core from a desktop GL version on, or available through
/// an extension before that.
const FEATURE_TABLE: [(DeviceFeatures, (u32, u32), &str); 16] = [
    (DeviceFeatures::CUBEMAP, (1, 3), "GL_ARB_texture_cube_map"),
    (DeviceFeatures::RECTANGLE, (3, 1), "GL_ARB_texture_rectangle"),
    (DeviceFeatures::ARRAY, (3, 0), "GL_EXT_texture_array"),
    (DeviceFeatures::TEXTURE_3D, (1, 2), "GL_EXT_texture3D"),
    (DeviceFeatures::DEPTH_TEXTURE, (1, 4), "GL_ARB_depth_texture"),
    (DeviceFeatures::MULTISAMPLE, (3, 2), "GL_ARB_texture_multisample"),
    (DeviceFeatures::SEAMLESS_CUBEMAP, (3, 2), "GL_ARB_seamless_cube_map"),
    (DeviceFeatures::GPU_SHADER4, (3, 0), "GL_EXT_gpu_shader4"),
    (DeviceFeatures::NPOT, (2, 0), "GL_ARB_texture_non_power_of_two"),
    (DeviceFeatures::BPTC, (4, 2), "GL_ARB_texture_compression_bptc"),
    (DeviceFeatures::FLOAT_TEXTURE, (3, 0), "GL_ARB_texture_float"),
    (DeviceFeatures::DEPTH_FLOAT, (3, 0), "GL_ARB_depth_buffer_float"),
    (DeviceFeatures::ANISOTROPY, (4, 6), "GL_EXT_texture_filter_anisotropic"),
    (DeviceFeatures::LOD_BIAS, (1, 4), "GL_EXT_texture_lod_bias"),
    (DeviceFeatures::CLAMP_TO_EDGE, (1, 2), "GL_EXT_texture_edge_clamp"),
    (DeviceFeatures::CLAMP_TO_BORDER, (1, 3), "GL_ARB_texture_border_clamp"),
];

/// Queries features and limits from a live context.
#[allow(unsafe_code)]
pub fn detect_caps(ctx: &glow::Context) -> DeviceCaps {
    let version = ctx.version();
    let extensions = ctx.supported_extensions();

    let mut features = DeviceFeatures::empty();
    for (feature, (major, minor), extension) in FEATURE_TABLE {
        let core = !version.is_embedded && (version.major, version.minor) >= (major, minor);
        if core || extensions.contains(extension) {
            features.insert(feature);
        }
    }

    // SAFETY: integer and float queries of implementation limits; the
    // anisotropy limit is only read when the extension is present.
    let (limits, vendor) = unsafe {
        let query = |pname: u32| ctx.get_parameter_i32(pname).max(0) as u32;
        let limits = DeviceLimits {
            max_2d_size: query(gl::MAX_TEXTURE_SIZE),
            max_3d_size: query(gl::MAX_3D_TEXTURE_SIZE),
            max_cubemap_size: query(gl::MAX_CUBE_MAP_TEXTURE_SIZE),
            max_rectangle_size: query(gl::MAX_RECTANGLE_TEXTURE_SIZE),
            max_array_layers: query(gl::MAX_ARRAY_TEXTURE_LAYERS),
            max_anisotropy: if features.contains(DeviceFeatures::ANISOTROPY) {
                ctx.get_parameter_f32(gl::MAX_TEXTURE_MAX_ANISOTROPY)
            } else {
                1.0
            },
            max_lod_bias: ctx.get_parameter_f32(gl::MAX_TEXTURE_LOD_BIAS),
            max_multisamples: query(gl::SAMPLES),
        };
        (limits, ctx.get_parameter_string(gl::VENDOR))
    };

    let vendor = vendor.to_ascii_uppercase();
    let hardware = if vendor.contains("ATI") || vendor.contains("AMD") {
        HardwareFamily::Radeon
    } else {
        HardwareFamily::Generic
    };

    log::debug!(
        "GL {}.{}: features {features:?}, max 2D size {}",
        version.major,
        version.minor,
        limits.max_2d_size
    );

    DeviceCaps {
        features,
        limits,
        hardware,
        display_bits: 32,
    }
}

/// A [`TextureDevice`] backed by a live GL context.
pub struct GlDevice {
    ctx: glow::Context,
    caps: DeviceCaps,
    textures: HashMap<usize, glow::Texture>,
}

impl GlDevice {
    /// Wraps `ctx` and detects its capabilities.
    pub fn new(ctx: glow::Context) -> Self {
        let caps = detect_caps(&ctx);
        Self::with_caps(ctx, caps)
    }

    /// Wraps `ctx` with explicitly chosen capabilities, e.g. to emulate older
    /// hardware.
    pub fn with_caps(ctx: glow::Context, caps: DeviceCaps) -> Self {
        Self {
            ctx,
            caps,
            textures: HashMap::new(),
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.ctx
    }

    /// The GL texture object behind `handle`, if one was created.
    pub fn texture(&self, handle: usize) -> Option<glow::Texture> {
        self.textures.get(&handle).copied()
    }

    #[allow(unsafe_code)]
    fn texture_for(&mut self, handle: usize) -> Option<glow::Texture> {
        if let Some(texture) = self.textures.get(&handle) {
            return Some(*texture);
        }
        // SAFETY: creating a texture name has no preconditions.
        match unsafe { self.ctx.create_texture() } {
            Ok(texture) => {
                self.textures.insert(handle, texture);
                Some(texture)
            }
            Err(err) => {
                log::error!("cannot create texture object for handle {handle}: {err}");
                None
            }
        }
    }
}

impl TextureDevice for GlDevice {
    fn capabilities(&self) -> &DeviceCaps {
        &self.caps
    }

    #[allow(unsafe_code)]
    fn bind(&mut self, target: TextureTarget, handle: usize) {
        if target == TextureTarget::None {
            return;
        }
        let texture = self.texture_for(handle);
        // SAFETY: `texture` was created by this context.
        unsafe { self.ctx.bind_texture(target.gl_enum(), texture) };
    }

    fn upload(&mut self, command: &UploadCommand<'_>) {
        upload_level(&self.ctx, command);
    }

    fn apply_sampler(&mut self, handle: usize, target: TextureTarget, sampler: &SamplerState) {
        self.bind(target, handle);
        apply_sampler(&self.ctx, target, sampler);
    }

    #[allow(unsafe_code)]
    fn delete(&mut self, handle: usize) {
        if let Some(texture) = self.textures.remove(&handle) {
            // SAFETY: `texture` belongs to this context and is no longer
            // referenced by the handle map.
            unsafe { self.ctx.delete_texture(texture) };
        }
    }

    #[allow(unsafe_code)]
    fn take_error(&mut self) -> Option<u32> {
        // SAFETY: error queries have no preconditions.
        let code = unsafe { self.ctx.get_error() };
        (code != gl::NO_ERROR).then_some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_device_implements_texture_device() {
        fn _assert_api(device: &mut GlDevice) -> &mut dyn TextureDevice {
            device
        }
    }

    #[test]
    fn feature_table_covers_every_feature() {
        let covered = FEATURE_TABLE
            .iter()
            .fold(DeviceFeatures::empty(), |acc, (feature, _, _)| acc | *feature);
        assert_eq!(covered, DeviceFeatures::all());
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_detects_capabilities() {
        // Would test: GlDevice::new(ctx) reports a non-zero max 2D size.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn delete_releases_texture_object() {
        // Would test: texture(handle) is None after delete(handle).
    }
}
