//! Renderer-wide texture settings.
//!
//! Settings arrive as a loose JSON object (a config file, a console, the CLI).
//! Missing keys and values of the wrong type fall back to the defaults; parsing
//! never fails.

use serde::Serialize;
use serde_json::Value;

use crate::caps::{DeviceCaps, DeviceFeatures};

/// Filtering, upload and diagnostic preferences consumed by the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureSettings {
    /// Maximum anisotropy for mipmapped textures.
    pub anisotropy: f32,
    pub lod_bias: f32,
    /// Point-sample every mipmapped texture.
    pub texture_nearest: bool,
    /// Point-sample lightmaps.
    pub lightmap_nearest: bool,
    /// Power-of-two round-down step; see [`crate::dimensions::round_to_power_of_two`].
    pub round_down: u32,
    /// Requested samples for multisample textures.
    pub msaa_samples: u32,
    /// Compatibility mode for old content; disables the edge filter.
    pub quake_compatible: bool,
    /// Query the device error state after every committed level.
    pub check_errors: bool,
    /// Generate `ALPHA_CONTRAST` mips with the historical constant fill
    /// instead of a box filter.
    pub legacy_alpha_contrast_mips: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            anisotropy: 8.0,
            lod_bias: 0.0,
            texture_nearest: false,
            lightmap_nearest: false,
            round_down: 2,
            msaa_samples: 0,
            quake_compatible: false,
            check_errors: true,
            legacy_alpha_contrast_mips: false,
        }
    }
}

fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(default)
}

fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

impl TextureSettings {
    /// Builds settings from a JSON object, defaulting anything missing.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            anisotropy: param_f32(params, "anisotropy", d.anisotropy),
            lod_bias: param_f32(params, "lod_bias", d.lod_bias),
            texture_nearest: param_bool(params, "texture_nearest", d.texture_nearest),
            lightmap_nearest: param_bool(params, "lightmap_nearest", d.lightmap_nearest),
            round_down: param_u32(params, "round_down", d.round_down),
            msaa_samples: param_u32(params, "msaa_samples", d.msaa_samples),
            quake_compatible: param_bool(params, "quake_compatible", d.quake_compatible),
            check_errors: param_bool(params, "check_errors", d.check_errors),
            legacy_alpha_contrast_mips: param_bool(
                params,
                "legacy_alpha_contrast_mips",
                d.legacy_alpha_contrast_mips,
            ),
        }
    }

    /// Sample count for multisample storage: 2, 4, 8 or 16, anything else is 1.
    pub fn multisample_count(&self) -> u32 {
        match self.msaa_samples {
            2 | 4 | 8 | 16 => self.msaa_samples,
            _ => 1,
        }
    }

    /// Clamps anisotropy and LOD bias into the device's range. Returns true
    /// when anything changed.
    pub fn clamp_to_device(&mut self, caps: &DeviceCaps) -> bool {
        let mut changed = false;

        if caps.supports(DeviceFeatures::ANISOTROPY) {
            let clamped = self.anisotropy.clamp(1.0, caps.limits.max_anisotropy.max(1.0));
            if clamped != self.anisotropy {
                log::warn!("anisotropy {} clamped to {clamped}", self.anisotropy);
                self.anisotropy = clamped;
                changed = true;
            }
        }

        if caps.supports(DeviceFeatures::LOD_BIAS) {
            let max = caps.limits.max_lod_bias.abs();
            let clamped = self.lod_bias.clamp(-max, max);
            if clamped != self.lod_bias {
                log::warn!("texture LOD bias {} clamped to {clamped}", self.lod_bias);
                self.lod_bias = clamped;
                changed = true;
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(TextureSettings::from_json(&json!({})), TextureSettings::default());
    }

    #[test]
    fn non_object_gives_defaults() {
        assert_eq!(
            TextureSettings::from_json(&json!("fast")),
            TextureSettings::default()
        );
    }

    #[test]
    fn known_keys_are_read() {
        let settings = TextureSettings::from_json(&json!({
            "anisotropy": 4,
            "lod_bias": -0.5,
            "texture_nearest": true,
            "round_down": 0,
            "msaa_samples": 8,
            "quake_compatible": true,
        }));
        assert!((settings.anisotropy - 4.0).abs() < f32::EPSILON);
        assert!((settings.lod_bias + 0.5).abs() < f32::EPSILON);
        assert!(settings.texture_nearest);
        assert_eq!(settings.round_down, 0);
        assert_eq!(settings.msaa_samples, 8);
        assert!(settings.quake_compatible);
        assert!(!settings.lightmap_nearest);
    }

    #[test]
    fn wrong_types_fall_back_per_key() {
        let settings = TextureSettings::from_json(&json!({
            "anisotropy": "max",
            "round_down": -1,
            "check_errors": 0,
        }));
        let defaults = TextureSettings::default();
        assert_eq!(settings.anisotropy, defaults.anisotropy);
        assert_eq!(settings.round_down, defaults.round_down);
        assert_eq!(settings.check_errors, defaults.check_errors);
    }

    #[test]
    fn multisample_count_accepts_powers_of_two_only() {
        for (requested, expected) in [(0, 1), (1, 1), (2, 2), (3, 1), (4, 4), (16, 16), (32, 1)] {
            let settings = TextureSettings {
                msaa_samples: requested,
                ..TextureSettings::default()
            };
            assert_eq!(settings.multisample_count(), expected, "{requested}");
        }
    }

    #[test]
    fn clamping_respects_device_limits() {
        let caps = DeviceCaps::full();
        let mut settings = TextureSettings {
            anisotropy: 64.0,
            lod_bias: -9.0,
            ..TextureSettings::default()
        };
        assert!(settings.clamp_to_device(&caps));
        assert_eq!(settings.anisotropy, caps.limits.max_anisotropy);
        assert_eq!(settings.lod_bias, -caps.limits.max_lod_bias);
    }

    #[test]
    fn clamping_raises_anisotropy_to_one() {
        let mut settings = TextureSettings {
            anisotropy: 0.0,
            ..TextureSettings::default()
        };
        assert!(settings.clamp_to_device(&DeviceCaps::full()));
        assert_eq!(settings.anisotropy, 1.0);
    }

    #[test]
    fn unsupported_features_are_not_clamped() {
        let mut settings = TextureSettings {
            anisotropy: 64.0,
            ..TextureSettings::default()
        };
        assert!(!settings.clamp_to_device(&DeviceCaps::minimal()));
        assert_eq!(settings.anisotropy, 64.0);
    }

    #[test]
    fn in_range_settings_are_unchanged() {
        let mut settings = TextureSettings::default();
        assert!(!settings.clamp_to_device(&DeviceCaps::full()));
    }
}
