//! The graphics device seen by the texture pipeline.
//!
//! [`TextureDevice`] is the seam between pure planning code and the actual
//! graphics API. The `render` feature provides a GL implementation;
//! [`RecordingDevice`] is a headless implementation that records every call,
//! used by tests and by the CLI's dry runs.

use std::collections::VecDeque;

use serde::Serialize;

use crate::caps::DeviceCaps;
use crate::format::InternalFormat;
use crate::gl_enums as gl;
use crate::pixel_format::{DataType, TransferFormat};
use crate::sampler::SamplerState;
use crate::target::TextureTarget;

/// Whether a level call allocates storage or overwrites existing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    Define,
    Update,
}

/// Texel data for one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// Uncompressed texels; `None` allocates without contents.
    Raw {
        format: TransferFormat,
        data_type: DataType,
        data: Option<&'a [u8]>,
    },
    /// Block-compressed data of exactly `size` bytes.
    Compressed { size: usize, data: Option<&'a [u8]> },
}

impl<'a> Payload<'a> {
    pub fn data(&self) -> Option<&'a [u8]> {
        match *self {
            Payload::Raw { data, .. } | Payload::Compressed { data, .. } => data,
        }
    }
}

/// One storage call: a single side and level of a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadCommand<'a> {
    pub handle: usize,
    pub target: TextureTarget,
    /// Cubemap face, 0 for every other target.
    pub side: u32,
    pub level: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub internal_format: InternalFormat,
    pub mode: StorageMode,
    /// Sample count; only meaningful for multisample targets.
    pub samples: u32,
    pub payload: Payload<'a>,
}

impl UploadCommand<'_> {
    /// GL target enum the level is written to; cubemap faces are addressed
    /// individually.
    pub fn image_target(&self) -> u32 {
        match self.target {
            TextureTarget::TextureCube => gl::TEXTURE_CUBE_MAP_POSITIVE_X + self.side,
            target => target.gl_enum(),
        }
    }
}

/// Texture object creation, storage and state calls.
pub trait TextureDevice {
    fn capabilities(&self) -> &DeviceCaps;

    /// Makes `handle` the current texture for `target`, creating the texture
    /// object if needed.
    fn bind(&mut self, target: TextureTarget, handle: usize);

    /// Commits one level to the currently bound texture.
    fn upload(&mut self, command: &UploadCommand<'_>);

    fn apply_sampler(&mut self, handle: usize, target: TextureTarget, sampler: &SamplerState);

    /// Releases the texture object behind `handle`.
    fn delete(&mut self, handle: usize);

    /// Returns and clears the pending device error, if any.
    fn take_error(&mut self) -> Option<u32>;
}

/// An upload with its payload copied out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedUpload {
    pub handle: usize,
    pub target: TextureTarget,
    pub side: u32,
    pub level: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub internal_format: InternalFormat,
    pub mode: StorageMode,
    pub samples: u32,
    pub compressed: bool,
    #[serde(skip)]
    pub data: Option<Vec<u8>>,
}

impl From<&UploadCommand<'_>> for RecordedUpload {
    fn from(command: &UploadCommand<'_>) -> Self {
        Self {
            handle: command.handle,
            target: command.target,
            side: command.side,
            level: command.level,
            width: command.width,
            height: command.height,
            depth: command.depth,
            internal_format: command.internal_format,
            mode: command.mode,
            samples: command.samples,
            compressed: matches!(command.payload, Payload::Compressed { .. }),
            data: command.payload.data().map(<[u8]>::to_vec),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCall {
    Bind {
        target: TextureTarget,
        handle: usize,
    },
    Upload(RecordedUpload),
    Sampler {
        handle: usize,
        target: TextureTarget,
        sampler: SamplerState,
    },
    Delete {
        handle: usize,
    },
}

/// Headless device that records every call.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    caps: DeviceCaps,
    calls: Vec<DeviceCall>,
    errors: VecDeque<u32>,
    upload_error: Option<u32>,
}

impl RecordingDevice {
    pub fn new(caps: DeviceCaps) -> Self {
        Self {
            caps,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn uploads(&self) -> impl Iterator<Item = &RecordedUpload> {
        self.calls.iter().filter_map(|call| match call {
            DeviceCall::Upload(upload) => Some(upload),
            _ => None,
        })
    }

    pub fn uploads_for(&self, handle: usize) -> impl Iterator<Item = &RecordedUpload> {
        self.uploads().filter(move |upload| upload.handle == handle)
    }

    /// Last sampler state applied to `handle`.
    pub fn sampler_for(&self, handle: usize) -> Option<&SamplerState> {
        self.calls.iter().rev().find_map(|call| match call {
            DeviceCall::Sampler {
                handle: h, sampler, ..
            } if *h == handle => Some(sampler),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Queues an error code for the next [`TextureDevice::take_error`].
    pub fn push_error(&mut self, code: u32) {
        self.errors.push_back(code);
    }

    /// Makes every later upload raise `code`.
    pub fn fail_uploads_with(&mut self, code: Option<u32>) {
        self.upload_error = code;
    }
}

impl TextureDevice for RecordingDevice {
    fn capabilities(&self) -> &DeviceCaps {
        &self.caps
    }

    fn bind(&mut self, target: TextureTarget, handle: usize) {
        self.calls.push(DeviceCall::Bind { target, handle });
    }

    fn upload(&mut self, command: &UploadCommand<'_>) {
        self.calls.push(DeviceCall::Upload(command.into()));
        if let Some(code) = self.upload_error {
            self.errors.push_back(code);
        }
    }

    fn apply_sampler(&mut self, handle: usize, target: TextureTarget, sampler: &SamplerState) {
        self.calls.push(DeviceCall::Sampler {
            handle,
            target,
            sampler: sampler.clone(),
        });
    }

    fn delete(&mut self, handle: usize) {
        self.calls.push(DeviceCall::Delete { handle });
    }

    fn take_error(&mut self) -> Option<u32> {
        self.errors.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(data: &[u8]) -> UploadCommand<'_> {
        UploadCommand {
            handle: 3,
            target: TextureTarget::TextureCube,
            side: 2,
            level: 0,
            width: 1,
            height: 1,
            depth: 1,
            internal_format: InternalFormat::Rgba8,
            mode: StorageMode::Define,
            samples: 1,
            payload: Payload::Raw {
                format: TransferFormat::Rgba,
                data_type: DataType::UnsignedByte,
                data: Some(data),
            },
        }
    }

    #[test]
    fn cube_faces_address_individual_targets() {
        let data = [0u8; 4];
        assert_eq!(command(&data).image_target(), gl::TEXTURE_CUBE_MAP_POSITIVE_X + 2);
    }

    #[test]
    fn recording_device_copies_payloads() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let data = [1u8, 2, 3, 4];
        device.upload(&command(&data));
        let upload = device.uploads().next().unwrap();
        assert_eq!(upload.data.as_deref(), Some(&data[..]));
        assert!(!upload.compressed);
    }

    #[test]
    fn errors_are_taken_once() {
        let mut device = RecordingDevice::default();
        device.push_error(0x0501);
        assert_eq!(device.take_error(), Some(0x0501));
        assert_eq!(device.take_error(), None);
    }

    #[test]
    fn upload_errors_follow_each_upload() {
        let mut device = RecordingDevice::default();
        device.fail_uploads_with(Some(0x0505));
        let data = [0u8; 4];
        device.upload(&command(&data));
        assert_eq!(device.take_error(), Some(0x0505));
        assert_eq!(device.take_error(), None);
    }

    #[test]
    fn uploads_for_filters_by_handle() {
        let mut device = RecordingDevice::default();
        let data = [0u8; 4];
        device.upload(&command(&data));
        device.bind(TextureTarget::Texture2D, 3);
        assert_eq!(device.uploads_for(3).count(), 1);
        assert_eq!(device.uploads_for(4).count(), 0);
    }
}
