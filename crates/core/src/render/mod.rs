//! OpenGL texture backend.
//!
//! This module is only available when the `render` feature is enabled.
//!
//! # Module overview
//!
//! - [`context`] -- [`GlDevice`], a [`TextureDevice`](crate::TextureDevice)
//!   over a `glow::Context`, with capability detection.
//! - [`texture`] -- Per-level storage calls and sampler parameter application.

pub mod context;
pub mod texture;

pub use context::{detect_caps, GlDevice};
pub use texture::{apply_sampler, upload_level};
