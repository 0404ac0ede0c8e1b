//! Raw OpenGL enumerants used by the texture pipeline.
//!
//! Several of these come from legacy or vendor extensions (luminance and
//! intensity formats, 3Dc) that binding crates do not always expose, so the
//! values are spelled out here once and shared by the core and the `render`
//! backend.

pub const NO_ERROR: u32 = 0;
pub const VENDOR: u32 = 0x1F00;
pub const UNPACK_ALIGNMENT: u32 = 0x0CF5;

// Targets.
pub const TEXTURE_1D: u32 = 0x0DE0;
pub const TEXTURE_2D: u32 = 0x0DE1;
pub const TEXTURE_3D: u32 = 0x806F;
pub const TEXTURE_2D_ARRAY: u32 = 0x8C1A;
pub const TEXTURE_CUBE_MAP: u32 = 0x8513;
pub const TEXTURE_CUBE_MAP_POSITIVE_X: u32 = 0x8515;
pub const TEXTURE_RECTANGLE: u32 = 0x84F5;
pub const TEXTURE_2D_MULTISAMPLE: u32 = 0x9100;

// Pixel transfer formats and types.
pub const DEPTH_COMPONENT: u32 = 0x1902;
pub const RGB: u32 = 0x1907;
pub const RGBA: u32 = 0x1908;
pub const LUMINANCE: u32 = 0x1909;
pub const BGR: u32 = 0x80E0;
pub const BGRA: u32 = 0x80E1;
pub const UNSIGNED_BYTE: u32 = 0x1401;
pub const FLOAT: u32 = 0x1406;
pub const HALF_FLOAT: u32 = 0x140B;

// Uncompressed internal formats.
pub const LUMINANCE8: u32 = 0x8040;
pub const LUMINANCE8_ALPHA8: u32 = 0x8045;
pub const INTENSITY: u32 = 0x8049;
pub const INTENSITY8: u32 = 0x804B;
pub const RGB5: u32 = 0x8050;
pub const RGB8: u32 = 0x8051;
pub const RGBA4: u32 = 0x8056;
pub const RGBA8: u32 = 0x8058;
pub const DEPTH_COMPONENT16: u32 = 0x81A5;
pub const DEPTH_COMPONENT24: u32 = 0x81A6;
pub const DEPTH_COMPONENT32F: u32 = 0x8CAC;
pub const RG16F: u32 = 0x822F;
pub const RG32F: u32 = 0x8230;
pub const RGBA32F: u32 = 0x8814;
pub const RGB32F: u32 = 0x8815;
pub const LUMINANCE32F: u32 = 0x8818;
pub const RGBA16F: u32 = 0x881A;
pub const RGB16F: u32 = 0x881B;
pub const LUMINANCE16F: u32 = 0x881E;

// Compressed internal formats.
pub const COMPRESSED_RGB_S3TC_DXT1: u32 = 0x83F0;
pub const COMPRESSED_RGBA_S3TC_DXT3: u32 = 0x83F2;
pub const COMPRESSED_RGBA_S3TC_DXT5: u32 = 0x83F3;
pub const COMPRESSED_LUMINANCE_ALPHA_3DC_ATI: u32 = 0x8837;
pub const COMPRESSED_RED_GREEN_RGTC2: u32 = 0x8DBD;
pub const COMPRESSED_RGBA_BPTC_UNORM: u32 = 0x8E8C;
pub const COMPRESSED_RGB_BPTC_SIGNED_FLOAT: u32 = 0x8E8E;
pub const COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT: u32 = 0x8E8F;

// Sampler state.
pub const NEAREST: u32 = 0x2600;
pub const LINEAR: u32 = 0x2601;
pub const NEAREST_MIPMAP_NEAREST: u32 = 0x2700;
pub const LINEAR_MIPMAP_LINEAR: u32 = 0x2703;
pub const TEXTURE_MAG_FILTER: u32 = 0x2800;
pub const TEXTURE_MIN_FILTER: u32 = 0x2801;
pub const TEXTURE_WRAP_S: u32 = 0x2802;
pub const TEXTURE_WRAP_T: u32 = 0x2803;
pub const TEXTURE_WRAP_R: u32 = 0x8072;
pub const CLAMP: u32 = 0x2900;
pub const REPEAT: u32 = 0x2901;
pub const CLAMP_TO_BORDER: u32 = 0x812D;
pub const CLAMP_TO_EDGE: u32 = 0x812F;
pub const TEXTURE_BORDER_COLOR: u32 = 0x1004;
pub const TEXTURE_MAX_ANISOTROPY: u32 = 0x84FE;
pub const TEXTURE_LOD_BIAS: u32 = 0x8501;
pub const DEPTH_TEXTURE_MODE: u32 = 0x884B;
pub const TEXTURE_COMPARE_MODE: u32 = 0x884C;
pub const TEXTURE_COMPARE_FUNC: u32 = 0x884D;
pub const COMPARE_R_TO_TEXTURE: u32 = 0x884E;
pub const LEQUAL: u32 = 0x0203;

// Limits.
pub const MAX_TEXTURE_SIZE: u32 = 0x0D33;
pub const MAX_3D_TEXTURE_SIZE: u32 = 0x8073;
pub const MAX_CUBE_MAP_TEXTURE_SIZE: u32 = 0x851C;
pub const MAX_RECTANGLE_TEXTURE_SIZE: u32 = 0x84F8;
pub const MAX_ARRAY_TEXTURE_LAYERS: u32 = 0x88FF;
pub const MAX_TEXTURE_LOD_BIAS: u32 = 0x84FD;
pub const MAX_TEXTURE_MAX_ANISOTROPY: u32 = 0x84FF;
pub const MAX_SAMPLES: u32 = 0x8D57;
pub const SAMPLES: u32 = 0x80A9;
