//! Box resampling of RGBA8 images to arbitrary dimensions.
//!
//! Every output texel averages four source texels: two columns chosen a
//! quarter and three quarters of the way through the output texel's footprint
//! by a 16.16 fixed-point accumulator, on two rows chosen the same way. Color
//! data uses a truncating channel mean. Normal maps decode each sample to a
//! signed vector, sum, renormalize and re-encode with opaque alpha.

use glam::Vec3;

use crate::error::TextureError;

/// Bytes per RGBA8 texel.
pub const TEXEL_BYTES: usize = 4;

/// Fallback direction for normals that cancel out.
const CANONICAL_NORMAL: Vec3 = Vec3::new(0.5, 0.5, 1.0);

/// Maps an encoded normal component to `[-1, 1]`.
pub(crate) fn decode_component(byte: u8) -> f32 {
    f32::from(byte) / 255.0 * 2.0 - 1.0
}

pub(crate) fn decode_normal(texel: &[u8]) -> Vec3 {
    Vec3::new(
        decode_component(texel[0]),
        decode_component(texel[1]),
        decode_component(texel[2]),
    )
}

/// Normalizes a summed normal and encodes it as `128 + round(127 * c)`.
pub(crate) fn encode_normal(sum: Vec3) -> [u8; 4] {
    let normal = sum.try_normalize().unwrap_or(CANONICAL_NORMAL);
    let encode = |c: f32| (128.0 + (127.0 * c).round()).clamp(0.0, 255.0) as u8;
    [encode(normal.x), encode(normal.y), encode(normal.z), 255]
}

/// Source byte offsets of the two sample columns for every output column.
fn column_plan(in_width: usize, out_width: usize) -> (Vec<usize>, Vec<usize>) {
    let step = (in_width as u64 * 0x10000) / out_width as u64;
    let last = in_width - 1;
    let offsets = |start: u64| {
        (0..out_width as u64)
            .map(|i| (((start + i * step) >> 16) as usize).min(last) * TEXEL_BYTES)
            .collect::<Vec<_>>()
    };
    (offsets(step >> 2), offsets((step >> 2) * 3))
}

fn sample_row(y: usize, bias: f32, in_height: usize, out_height: usize) -> usize {
    let row = ((y as f32 + bias) * in_height as f32 / out_height as f32) as usize;
    row.min(in_height - 1)
}

/// Resamples a packed RGBA8 image into `out`, replacing its contents.
///
/// Resampling to the source's own dimensions reproduces it exactly (except
/// on the normal-map path, which re-encodes every texel).
pub fn resample_rgba8(
    source: &[u8],
    in_width: u32,
    in_height: u32,
    out_width: u32,
    out_height: u32,
    normal_map: bool,
    out: &mut Vec<u8>,
) -> Result<(), TextureError> {
    let (in_w, in_h) = (in_width as usize, in_height as usize);
    let (out_w, out_h) = (out_width as usize, out_height as usize);

    if in_w == 0 || in_h == 0 || out_w == 0 || out_h == 0 {
        return Err(TextureError::InvalidDimensions);
    }
    let needed = in_w * in_h * TEXEL_BYTES;
    if source.len() < needed {
        return Err(TextureError::InvalidImage(format!(
            "resample source holds {} bytes, {in_width}x{in_height} RGBA needs {needed}",
            source.len()
        )));
    }

    out.clear();
    out.resize(out_w * out_h * TEXEL_BYTES, 0);

    let (p1, p2) = column_plan(in_w, out_w);
    let in_stride = in_w * TEXEL_BYTES;

    for (y, dst_row) in out.chunks_exact_mut(out_w * TEXEL_BYTES).enumerate() {
        let r1 = sample_row(y, 0.25, in_h, out_h) * in_stride;
        let r2 = sample_row(y, 0.75, in_h, out_h) * in_stride;
        let row1 = &source[r1..r1 + in_stride];
        let row2 = &source[r2..r2 + in_stride];

        for (x, texel) in dst_row.chunks_exact_mut(TEXEL_BYTES).enumerate() {
            let samples = [
                &row1[p1[x]..p1[x] + TEXEL_BYTES],
                &row1[p2[x]..p2[x] + TEXEL_BYTES],
                &row2[p1[x]..p1[x] + TEXEL_BYTES],
                &row2[p2[x]..p2[x] + TEXEL_BYTES],
            ];

            if normal_map {
                let sum: Vec3 = samples.iter().map(|s| decode_normal(s)).sum();
                texel.copy_from_slice(&encode_normal(sum));
            } else {
                for (c, value) in texel.iter_mut().enumerate() {
                    let total: u32 = samples.iter().map(|s| u32::from(s[c])).sum();
                    *value = (total >> 2) as u8;
                }
            }
        }
    }

    Ok(())
}
