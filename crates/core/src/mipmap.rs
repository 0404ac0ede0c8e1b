//! Mip chain planning and 2:1 box-filter level generation.

use glam::Vec3;

use crate::dimensions::Extent;
use crate::error::TextureError;
use crate::flags::TextureFlags;
use crate::resample::{decode_normal, encode_normal, TEXEL_BYTES};
use crate::target::TextureTarget;

/// Upper bound on generated halvings.
pub const MAX_MIP_HALVINGS: u32 = 16;

/// Row alignment the device unpacks pixel rows with.
pub const UNPACK_ALIGNMENT: usize = 1;

/// Bytes per row of an RGBA8 image, padded to `alignment`.
pub fn row_stride(width: u32, alignment: usize) -> usize {
    (width as usize * TEXEL_BYTES).next_multiple_of(alignment.max(1))
}

/// Number of levels to upload for a texture whose levels are generated here.
///
/// One level when there is no pixel data, for volumes, and for `NOMIPMAP`;
/// otherwise one more than the halvings needed to bring both axes to 1.
pub fn mip_count(
    extent: Extent,
    flags: TextureFlags,
    target: TextureTarget,
    has_data: bool,
) -> u32 {
    if !has_data || target == TextureTarget::Texture3D || flags.contains(TextureFlags::NOMIPMAP)
    {
        return 1;
    }

    let halvings = (0..MAX_MIP_HALVINGS)
        .find(|&level| {
            let mip = extent.mip(level);
            mip.width == 1 && mip.height == 1
        })
        .unwrap_or(MAX_MIP_HALVINGS);
    halvings + 1
}

/// Writes the next mip level of a packed RGBA8 image into `out`.
///
/// Each layer is reduced independently. A destination texel averages the 2x2
/// block at twice its coordinates. A one-texel-wide source samples its column
/// twice and a one-row source pairs the row with itself; an odd trailing row
/// or column of a larger source falls outside the grid.
pub fn halve_rgba8(
    source: &[u8],
    extent: Extent,
    normal_map: bool,
    out: &mut Vec<u8>,
) -> Result<Extent, TextureError> {
    let Extent {
        width,
        height,
        depth,
    } = extent;
    if width == 0 || height == 0 {
        return Err(TextureError::InvalidDimensions);
    }

    let mip = Extent::new((width >> 1).max(1), (height >> 1).max(1), depth.max(1));
    let in_stride = row_stride(width, UNPACK_ALIGNMENT);
    let out_stride = row_stride(mip.width, UNPACK_ALIGNMENT);
    let in_layer = in_stride * height as usize;
    let out_layer = out_stride * mip.height as usize;
    let layers = mip.depth as usize;

    if source.len() < in_layer * layers {
        return Err(TextureError::InvalidImage(format!(
            "mip source holds {} bytes, {}x{}x{} RGBA needs {}",
            source.len(),
            width,
            height,
            layers,
            in_layer * layers
        )));
    }

    out.clear();
    out.resize(out_layer * layers, 0);

    let (src_w, src_h) = (width as usize, height as usize);
    for (layer_in, layer_out) in source
        .chunks_exact(in_layer)
        .zip(out.chunks_exact_mut(out_layer))
    {
        for (y, dst_row) in layer_out.chunks_exact_mut(out_stride).enumerate() {
            let top = 2 * y * in_stride;
            let bottom = if 2 * y + 1 < src_h { top + in_stride } else { top };
            let row = &layer_in[top..top + in_stride];
            let next = &layer_in[bottom..bottom + in_stride];

            for (x, texel) in dst_row
                .chunks_exact_mut(TEXEL_BYTES)
                .take(mip.width as usize)
                .enumerate()
            {
                let left = 2 * x * TEXEL_BYTES;
                // Without a right neighbour the column is sampled twice, which
                // equals the mean of its two texels.
                let right = if 2 * x + 1 < src_w {
                    left + TEXEL_BYTES
                } else {
                    left
                };
                let texels = [
                    &row[left..left + TEXEL_BYTES],
                    &row[right..right + TEXEL_BYTES],
                    &next[left..left + TEXEL_BYTES],
                    &next[right..right + TEXEL_BYTES],
                ];
                average_into(texel, &texels, normal_map);
            }
        }
    }

    Ok(mip)
}

fn average_into(texel: &mut [u8], samples: &[&[u8]; 4], normal_map: bool) {
    if normal_map {
        let sum: Vec3 = samples.iter().map(|s| decode_normal(s)).sum();
        texel.copy_from_slice(&encode_normal(sum));
        return;
    }
    for (c, value) in texel.iter_mut().enumerate() {
        let total: u32 = samples.iter().map(|s| u32::from(s[c])).sum();
        *value = (total >> 2) as u8;
    }
}

/// Legacy level generation for `ALPHA_CONTRAST` textures: every byte of the
/// next level is set to that level's width (truncated to a byte).
pub fn fill_alpha_contrast(extent: Extent, out: &mut Vec<u8>) -> Extent {
    let mip = Extent::new((extent.width >> 1).max(1), (extent.height >> 1).max(1), 1);
    out.clear();
    out.resize(mip.width as usize * mip.height as usize * TEXEL_BYTES, mip.width as u8);
    mip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(width: u32, height: u32) -> u32 {
        mip_count(
            Extent::new(width, height, 1),
            TextureFlags::empty(),
            TextureTarget::Texture2D,
            true,
        )
    }

    #[test]
    fn single_texel_has_one_level() {
        assert_eq!(count(1, 1), 1);
    }

    #[test]
    fn non_square_chain_follows_longest_axis() {
        assert_eq!(count(32, 16), 6);
        assert_eq!(count(256, 1), 9);
    }

    #[test]
    fn chain_length_is_capped() {
        assert_eq!(count(1 << 20, 1), MAX_MIP_HALVINGS + 1);
    }

    #[test]
    fn no_data_volume_and_nomipmap_get_one_level() {
        let extent = Extent::new(64, 64, 1);
        let flags = TextureFlags::empty();
        assert_eq!(mip_count(extent, flags, TextureTarget::Texture2D, false), 1);
        assert_eq!(mip_count(extent, flags, TextureTarget::Texture3D, true), 1);
        assert_eq!(
            mip_count(extent, TextureFlags::NOMIPMAP, TextureTarget::Texture2D, true),
            1
        );
    }

    #[test]
    fn halving_averages_each_2x2_block() {
        let source = [
            0, 0, 0, 0, 4, 4, 4, 4, //
            8, 8, 8, 8, 13, 13, 13, 13,
        ];
        let mut out = Vec::new();
        let mip = halve_rgba8(&source, Extent::new(2, 2, 1), false, &mut out).unwrap();
        assert_eq!(mip, Extent::new(1, 1, 1));
        assert_eq!(out, vec![6, 6, 6, 6]);
    }

    #[test]
    fn odd_width_drops_the_trailing_column() {
        let source = [
            0, 0, 0, 0, 0, 0, 0, 0, 10, 20, 30, 40, //
            0, 0, 0, 0, 0, 0, 0, 0, 20, 30, 40, 51,
        ];
        let mut out = Vec::new();
        let mip = halve_rgba8(&source, Extent::new(3, 2, 1), false, &mut out).unwrap();
        assert_eq!(mip, Extent::new(1, 1, 1));
        assert_eq!(out, vec![0, 0, 0, 0]);
    }

    #[test]
    fn single_column_pairs_rows() {
        let source = [10, 10, 10, 10, 21, 21, 21, 21];
        let mut out = Vec::new();
        let mip = halve_rgba8(&source, Extent::new(1, 2, 1), false, &mut out).unwrap();
        assert_eq!(mip, Extent::new(1, 1, 1));
        assert_eq!(out, vec![15, 15, 15, 15]);
    }

    #[test]
    fn single_row_pairs_with_itself() {
        let source = [10, 10, 10, 10, 20, 20, 20, 20];
        let mut out = Vec::new();
        let mip = halve_rgba8(&source, Extent::new(2, 1, 1), false, &mut out).unwrap();
        assert_eq!(mip, Extent::new(1, 1, 1));
        assert_eq!(out, vec![15, 15, 15, 15]);
    }

    #[test]
    fn layers_are_halved_independently() {
        let mut source = [1u8; 16].to_vec();
        source.extend([9u8; 16]);
        let mut out = Vec::new();
        let mip = halve_rgba8(&source, Extent::new(2, 2, 2), false, &mut out).unwrap();
        assert_eq!(mip, Extent::new(1, 1, 2));
        assert_eq!(out, vec![1, 1, 1, 1, 9, 9, 9, 9]);
    }

    #[test]
    fn normal_maps_stay_unit_length() {
        let source = [128, 128, 255, 10].repeat(4);
        let mut out = Vec::new();
        halve_rgba8(&source, Extent::new(2, 2, 1), true, &mut out).unwrap();
        assert_eq!(out[2], 255);
        assert_eq!(out[3], 255);
    }

    #[test]
    fn short_source_is_rejected() {
        let mut out = Vec::new();
        let err = halve_rgba8(&[0; 8], Extent::new(2, 2, 1), false, &mut out).unwrap_err();
        assert!(matches!(err, TextureError::InvalidImage(_)));
    }

    #[test]
    fn alpha_contrast_fill_writes_mip_width() {
        let mut out = Vec::new();
        let mip = fill_alpha_contrast(Extent::new(8, 4, 1), &mut out);
        assert_eq!(mip, Extent::new(4, 2, 1));
        assert_eq!(out.len(), 4 * 2 * 4);
        assert!(out.iter().all(|&b| b == 4));
    }

    #[test]
    fn unit_alignment_adds_no_padding() {
        assert_eq!(row_stride(17, UNPACK_ALIGNMENT), 68);
        assert_eq!(row_stride(3, 8), 16);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mip_count_is_monotonic(width in 1u32..4096, height in 1u32..4096) {
                let full = count(width, height);
                let half = count((width / 2).max(1), (height / 2).max(1));
                prop_assert!(full >= half, "{width}x{height}: {full} < {half}");
            }

            #[test]
            fn uniform_color_survives_halving(
                color in any::<[u8; 4]>(),
                width in 1u32..33,
                height in 1u32..33,
            ) {
                let source = color.repeat((width * height) as usize);
                let mut out = Vec::new();
                let mip = halve_rgba8(&source, Extent::new(width, height, 1), false, &mut out)
                    .unwrap();
                prop_assert_eq!(out.len(), (mip.width * mip.height) as usize * 4);
                prop_assert!(out.chunks_exact(4).all(|t| t == color));
            }
        }
    }
}
