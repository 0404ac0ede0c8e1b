#![deny(unsafe_code)]
//! Source image helpers for the texture pipeline: synthetic test patterns,
//! RGBA buffer conversion and PNG import/export.
//!
//! Sits between `texpipe-core` (registry and upload pipeline) and front ends
//! such as the CLI, so that image acquisition is not duplicated per binary.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use serde_json::Value;
use texpipe_core::error::TextureError;
use texpipe_core::flags::TextureFlags;
use texpipe_core::image::SourceImage;

use crate::pixel::rgba_to_source;

/// All available pattern names.
const PATTERN_NAMES: &[&str] = &["checker", "gradient", "normal-bump", "cutout", "solid"];

const DEFAULT_CELL: u32 = 8;
const DEFAULT_COLOR: [u8; 4] = [128, 96, 64, 255];

/// Synthetic source images for exercising the pipeline without files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Magenta/black squares, `cell` texels wide.
    Checker,
    /// Red along x, green along y.
    Gradient,
    /// Tangent-space normal map of a single hemispherical bump.
    NormalBump,
    /// Opaque disc on a fully transparent background.
    Cutout,
    /// One flat color.
    Solid,
}

impl PatternKind {
    /// Looks a pattern up by name.
    ///
    /// Returns `TextureError::UnknownPattern` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, TextureError> {
        match name {
            "checker" => Ok(PatternKind::Checker),
            "gradient" => Ok(PatternKind::Gradient),
            "normal-bump" => Ok(PatternKind::NormalBump),
            "cutout" => Ok(PatternKind::Cutout),
            "solid" => Ok(PatternKind::Solid),
            _ => Err(TextureError::UnknownPattern(name.to_string())),
        }
    }

    /// Returns a slice of all recognized pattern names.
    pub fn list_patterns() -> &'static [&'static str] {
        PATTERN_NAMES
    }

    /// Texture flags a pattern should be registered with.
    pub fn texture_flags(self) -> TextureFlags {
        match self {
            PatternKind::NormalBump => TextureFlags::NORMALMAP,
            _ => TextureFlags::empty(),
        }
    }

    /// Renders the pattern as a single-level RGBA8 image.
    ///
    /// `params` may carry `"cell"` (checker size) and `"color"` (RGBA array
    /// for solid and cutout); missing keys use defaults.
    pub fn render(self, width: u32, height: u32, params: &Value) -> Result<SourceImage, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions);
        }
        let cell = params
            .get("cell")
            .and_then(Value::as_u64)
            .map_or(DEFAULT_CELL, |c| c.clamp(1, u32::MAX as u64) as u32);
        let color = parse_color(params.get("color"))?;

        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let texel = match self {
                    PatternKind::Checker => {
                        if ((x / cell) + (y / cell)) % 2 == 0 {
                            [255, 0, 255, 255]
                        } else {
                            [0, 0, 0, 255]
                        }
                    }
                    PatternKind::Gradient => [ramp(x, width), ramp(y, height), 128, 255],
                    PatternKind::NormalBump => bump_normal(x, y, width, height),
                    PatternKind::Cutout => {
                        let (u, v) = centered(x, y, width, height);
                        if u * u + v * v <= 0.64 {
                            [color[0], color[1], color[2], 255]
                        } else {
                            [0, 0, 0, 0]
                        }
                    }
                    PatternKind::Solid => color,
                };
                pixels.extend_from_slice(&texel);
            }
        }
        rgba_to_source(width, height, pixels)
    }
}

fn parse_color(value: Option<&Value>) -> Result<[u8; 4], TextureError> {
    let Some(value) = value else {
        return Ok(DEFAULT_COLOR);
    };
    let channels = value
        .as_array()
        .filter(|a| a.len() == 3 || a.len() == 4)
        .ok_or_else(|| TextureError::InvalidImage("color must be an array of 3 or 4 bytes".into()))?;

    let mut color = [255u8; 4];
    for (slot, channel) in color.iter_mut().zip(channels) {
        *slot = channel
            .as_u64()
            .and_then(|c| u8::try_from(c).ok())
            .ok_or_else(|| TextureError::InvalidImage(format!("color channel {channel} is not a byte")))?;
    }
    Ok(color)
}

fn ramp(i: u32, extent: u32) -> u8 {
    if extent <= 1 {
        return 0;
    }
    (i as u64 * 255 / (extent as u64 - 1)) as u8
}

/// Texel center mapped to [-1, 1] on both axes.
fn centered(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    let u = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
    let v = (y as f32 + 0.5) / height as f32 * 2.0 - 1.0;
    (u, v)
}

fn bump_normal(x: u32, y: u32, width: u32, height: u32) -> [u8; 4] {
    const RADIUS: f32 = 0.8;
    let (u, v) = centered(x, y, width, height);
    let d2 = u * u + v * v;
    let normal = if d2 < RADIUS * RADIUS {
        [u / RADIUS, v / RADIUS, (RADIUS * RADIUS - d2).sqrt() / RADIUS]
    } else {
        [0.0, 0.0, 1.0]
    };
    let encode = |n: f32| ((n * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8;
    [encode(normal[0]), encode(normal[1]), encode(normal[2]), 255]
}
