//! GL storage and sampler calls for one texture.
//!
//! Both functions act on the texture currently bound to the command's target.

use glow::HasContext;

use crate::device::{Payload, StorageMode, UploadCommand};
use crate::gl_enums as gl;
use crate::mipmap::UNPACK_ALIGNMENT;
use crate::sampler::SamplerState;
use crate::target::TextureTarget;

const WRAP_AXES: [u32; 3] = [gl::TEXTURE_WRAP_S, gl::TEXTURE_WRAP_T, gl::TEXTURE_WRAP_R];

/// Defines or updates one side and level of the bound texture.
#[allow(unsafe_code)]
pub fn upload_level(ctx: &glow::Context, command: &UploadCommand<'_>) {
    let target = command.image_target();
    let level = command.level as i32;
    let internal_format = command.internal_format.gl_enum() as i32;
    let (width, height, depth) = (
        command.width as i32,
        command.height as i32,
        command.depth as i32,
    );

    match command.payload {
        Payload::Compressed { size, data } => {
            if command.target == TextureTarget::Texture1D {
                log::warn!("compressed data cannot be stored in a 1D texture");
                return;
            }
            let zeroed;
            let bytes = match data {
                Some(bytes) => bytes,
                None => {
                    zeroed = vec![0u8; size];
                    &zeroed
                }
            };
            // SAFETY: `bytes` holds exactly `size` bytes, the image size
            // passed to GL for this level.
            unsafe {
                ctx.pixel_store_i32(gl::UNPACK_ALIGNMENT, UNPACK_ALIGNMENT as i32);
                if command.target.is_layered() {
                    ctx.compressed_tex_image_3d(
                        target,
                        level,
                        internal_format,
                        width,
                        height,
                        depth,
                        0,
                        size as i32,
                        bytes,
                    );
                } else {
                    ctx.compressed_tex_image_2d(
                        target,
                        level,
                        internal_format,
                        width,
                        height,
                        0,
                        size as i32,
                        bytes,
                    );
                }
            }
        }
        Payload::Raw {
            format,
            data_type,
            data,
        } => {
            let format = format.gl_enum();
            let ty = data_type.gl_enum();
            let pixels = glow::PixelUnpackData::Slice(data);
            let update = command.mode == StorageMode::Update && data.is_some();

            // SAFETY: the planner sized `data` for this level's dimensions,
            // format and component type; `None` allocates without reading.
            unsafe {
                ctx.pixel_store_i32(gl::UNPACK_ALIGNMENT, UNPACK_ALIGNMENT as i32);
                match command.target {
                    TextureTarget::TextureMultisample => ctx.tex_image_2d_multisample(
                        target,
                        command.samples as i32,
                        internal_format,
                        width,
                        height,
                        false,
                    ),
                    TextureTarget::Texture1D => ctx.tex_image_1d(
                        target,
                        level,
                        internal_format,
                        width,
                        0,
                        format,
                        ty,
                        pixels,
                    ),
                    TextureTarget::Texture3D | TextureTarget::TextureArray if update => ctx
                        .tex_sub_image_3d(
                            target, level, 0, 0, 0, width, height, depth, format, ty, pixels,
                        ),
                    TextureTarget::Texture3D | TextureTarget::TextureArray => ctx.tex_image_3d(
                        target,
                        level,
                        internal_format,
                        width,
                        height,
                        depth,
                        0,
                        format,
                        ty,
                        pixels,
                    ),
                    _ if update => ctx.tex_sub_image_2d(
                        target, level, 0, 0, width, height, format, ty, pixels,
                    ),
                    _ => ctx.tex_image_2d(
                        target,
                        level,
                        internal_format,
                        width,
                        height,
                        0,
                        format,
                        ty,
                        pixels,
                    ),
                }
            }
        }
    }
}

/// Writes filter, anisotropy, LOD bias, wrap and depth compare state.
#[allow(unsafe_code)]
pub fn apply_sampler(ctx: &glow::Context, target: TextureTarget, sampler: &SamplerState) {
    let target = target.gl_enum();

    // SAFETY: plain parameter writes on the bound texture with enumerants
    // valid for `target`.
    unsafe {
        if let Some(depth) = sampler.depth {
            if depth.compare {
                ctx.tex_parameter_i32(
                    target,
                    gl::TEXTURE_COMPARE_MODE,
                    gl::COMPARE_R_TO_TEXTURE as i32,
                );
                ctx.tex_parameter_i32(target, gl::TEXTURE_COMPARE_FUNC, gl::LEQUAL as i32);
            }
            ctx.tex_parameter_i32(target, gl::DEPTH_TEXTURE_MODE, depth.mode.gl_enum() as i32);
        }

        ctx.tex_parameter_i32(
            target,
            gl::TEXTURE_MIN_FILTER,
            sampler.min_filter.gl_enum() as i32,
        );
        ctx.tex_parameter_i32(
            target,
            gl::TEXTURE_MAG_FILTER,
            sampler.mag_filter.gl_enum() as i32,
        );
        if let Some(anisotropy) = sampler.anisotropy {
            ctx.tex_parameter_f32(target, gl::TEXTURE_MAX_ANISOTROPY, anisotropy);
        }
        if let Some(bias) = sampler.lod_bias {
            ctx.tex_parameter_f32(target, gl::TEXTURE_LOD_BIAS, bias);
        }

        for axis in WRAP_AXES.iter().take(sampler.wrap_axes) {
            ctx.tex_parameter_i32(target, *axis, sampler.wrap.gl_enum() as i32);
        }
        if let Some(color) = sampler.border_color {
            ctx.tex_parameter_f32_slice(target, gl::TEXTURE_BORDER_COLOR, &color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_api_compiles_with_expected_signatures() {
        fn _assert_api(ctx: &glow::Context, command: &UploadCommand<'_>, sampler: &SamplerState) {
            upload_level(ctx, command);
            apply_sampler(ctx, TextureTarget::Texture2D, sampler);
        }
    }

    #[test]
    fn wrap_axes_are_s_t_r() {
        assert_eq!(WRAP_AXES, [0x2802, 0x2803, 0x8072]);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn upload_level_defines_storage() {
        // Would test: a 4x4 RGBA8 level reads back with the uploaded texels.
    }
}
