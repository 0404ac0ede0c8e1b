//! Color bleed for cut-out textures.
//!
//! Fully transparent texels next to opaque ones take the mean color of their
//! opaque neighbours so bilinear filtering at alpha edges does not pull in
//! black. Alpha itself is left at zero.

use crate::resample::TEXEL_BYTES;

/// Mean color of the non-transparent texels in the 3x3 window around
/// `(x, y)`, clipped to the image. Returns black when there are none.
fn neighbour_mean(pixels: &[u8], width: usize, height: usize, x: usize, y: usize) -> [u8; 3] {
    let mut sum = [0u32; 3];
    let mut count = 0u32;

    for v in y.saturating_sub(1)..=(y + 1).min(height - 1) {
        for u in x.saturating_sub(1)..=(x + 1).min(width - 1) {
            let texel = &pixels[(v * width + u) * TEXEL_BYTES..][..TEXEL_BYTES];
            if texel[3] != 0 {
                for (acc, &c) in sum.iter_mut().zip(texel) {
                    *acc += u32::from(c);
                }
                count += 1;
            }
        }
    }

    let count = count.max(1);
    sum.map(|c| (c / count) as u8)
}

/// Runs the edge filter over a packed RGBA8 image in place.
///
/// Texels are visited in row-major order and updated immediately, so a
/// filled texel is seen by later neighbours only through its alpha, which
/// stays zero.
pub fn apply_edge_filter(pixels: &mut [u8], width: u32, height: u32) {
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 || pixels.len() < width * height * TEXEL_BYTES {
        return;
    }

    for i in 0..width * height {
        let offset = i * TEXEL_BYTES;
        if pixels[offset..offset + TEXEL_BYTES] == [0, 0, 0, 0] {
            let color = neighbour_mean(pixels, width, height, i % width, i / width);
            pixels[offset..offset + 3].copy_from_slice(&color);
        }
    }
}
