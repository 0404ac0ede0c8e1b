//! Hardware capabilities reported by the graphics device.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Optional texture features the device may expose.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct DeviceFeatures: u32 {
        const CUBEMAP = 1 << 0;
        const RECTANGLE = 1 << 1;
        const ARRAY = 1 << 2;
        const TEXTURE_3D = 1 << 3;
        const DEPTH_TEXTURE = 1 << 4;
        const MULTISAMPLE = 1 << 5;
        const SEAMLESS_CUBEMAP = 1 << 6;
        /// Shader model 4 class hardware; required for depth cubemaps.
        const GPU_SHADER4 = 1 << 7;
        /// Non-power-of-two dimensions.
        const NPOT = 1 << 8;
        /// BC6H/BC7 block compression.
        const BPTC = 1 << 9;
        const FLOAT_TEXTURE = 1 << 10;
        const DEPTH_FLOAT = 1 << 11;
        const ANISOTROPY = 1 << 12;
        const LOD_BIAS = 1 << 13;
        const CLAMP_TO_EDGE = 1 << 14;
        const CLAMP_TO_BORDER = 1 << 15;
    }
}

/// Per-target maximum dimensions and sampler ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceLimits {
    pub max_2d_size: u32,
    pub max_3d_size: u32,
    pub max_cubemap_size: u32,
    pub max_rectangle_size: u32,
    pub max_array_layers: u32,
    pub max_anisotropy: f32,
    pub max_lod_bias: f32,
    /// Samples of the default framebuffer; above 1 disables the edge filter.
    pub max_multisamples: u32,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            max_2d_size: 4096,
            max_3d_size: 512,
            max_cubemap_size: 2048,
            max_rectangle_size: 4096,
            max_array_layers: 256,
            max_anisotropy: 16.0,
            max_lod_bias: 2.0,
            max_multisamples: 0,
        }
    }
}

/// GPU family; only matters for the encoding of two-channel compressed normals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareFamily {
    #[default]
    Generic,
    Radeon,
}

/// Everything the pipeline needs to know about the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceCaps {
    pub features: DeviceFeatures,
    pub limits: DeviceLimits,
    pub hardware: HardwareFamily,
    /// Bits per pixel of the display mode (16 or 32 in practice).
    pub display_bits: u32,
}

impl DeviceCaps {
    /// A modern desktop device: every feature, default limits, 32-bit display.
    pub fn full() -> Self {
        Self {
            features: DeviceFeatures::all(),
            limits: DeviceLimits::default(),
            hardware: HardwareFamily::Generic,
            display_bits: 32,
        }
    }

    /// The oldest class of hardware: 2D textures only, power-of-two sizes.
    pub fn minimal() -> Self {
        Self {
            features: DeviceFeatures::empty(),
            limits: DeviceLimits::default(),
            hardware: HardwareFamily::Generic,
            display_bits: 32,
        }
    }

    pub fn supports(&self, feature: DeviceFeatures) -> bool {
        self.features.contains(feature)
    }

    /// Builder-style helper used by tests and the CLI.
    pub fn without(mut self, feature: DeviceFeatures) -> Self {
        self.features.remove(feature);
        self
    }
}

impl Default for DeviceCaps {
    fn default() -> Self {
        Self::full()
    }
}
