//! Fixed-capacity texture table.
//!
//! [`TextureRegistry`] owns one [`TextureRecord`] per handle plus the settings
//! and scratch buffers shared by every upload. Handles index the table
//! directly; a slot is either free (zeroed) or used.

use serde::Serialize;

use crate::caps::{DeviceCaps, DeviceFeatures};
use crate::device::TextureDevice;
use crate::dimensions::clamp_dimensions;
use crate::error::TextureError;
use crate::flags::{ImageFlags, TextureFlags};
use crate::format::{texture_size, transfer_data_type};
use crate::image::SourceImage;
use crate::pixel_format::PixelFormat;
use crate::record::TextureRecord;
use crate::report::TextureListReport;
use crate::sampler::{normalize_wrap_flags, sampler_state};
use crate::settings::TextureSettings;
use crate::target::TextureTarget;
use crate::upload::{upload_texture, ScratchBuffers};

/// Default number of slots.
pub const MAX_TEXTURES: usize = 4096;

/// Diagnostic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub uploads: usize,
    pub failed_uploads: usize,
    pub device_errors: usize,
}

#[derive(Debug)]
pub struct TextureRegistry {
    records: Vec<TextureRecord>,
    settings: TextureSettings,
    scratch: ScratchBuffers,
    default_texture: usize,
    stats: RegistryStats,
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new(TextureSettings::default())
    }
}

impl TextureRegistry {
    pub fn new(settings: TextureSettings) -> Self {
        Self::with_capacity(MAX_TEXTURES, settings)
    }

    pub fn with_capacity(capacity: usize, settings: TextureSettings) -> Self {
        Self {
            records: (0..capacity).map(TextureRecord::free).collect(),
            settings,
            scratch: ScratchBuffers::default(),
            default_texture: 0,
            stats: RegistryStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    pub fn settings(&self) -> &TextureSettings {
        &self.settings
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    pub fn default_texture(&self) -> usize {
        self.default_texture
    }

    /// Sets the texture bound in place of missing or invalid handles.
    pub fn set_default_texture(&mut self, handle: usize) -> Result<(), TextureError> {
        self.check_handle(handle)?;
        self.default_texture = handle;
        Ok(())
    }

    fn check_handle(&self, handle: usize) -> Result<(), TextureError> {
        if handle >= self.records.len() {
            return Err(TextureError::InvalidHandle {
                handle,
                capacity: self.records.len(),
            });
        }
        Ok(())
    }

    /// The record at `handle`, used or not.
    pub fn get(&self, handle: usize) -> Result<&TextureRecord, TextureError> {
        self.check_handle(handle)?;
        Ok(&self.records[handle])
    }

    /// Used records in handle order.
    pub fn records(&self) -> impl Iterator<Item = &TextureRecord> {
        self.records.iter().filter(|record| record.used)
    }

    /// Creates the texture at `handle` from `image`, or re-uploads it when
    /// `update` is set.
    ///
    /// Loading into a used slot without `update` does nothing. An update ORs
    /// `flags` into the record and fails with [`TextureError::NotLoaded`] on a
    /// free slot. A failed update leaves the record as it was; a failed fresh
    /// load leaves a used record with no target.
    pub fn load(
        &mut self,
        device: &mut dyn TextureDevice,
        handle: usize,
        name: &str,
        mut image: SourceImage,
        flags: TextureFlags,
        update: bool,
    ) -> Result<&TextureRecord, TextureError> {
        self.check_handle(handle)?;
        if self.records[handle].used && !update {
            return Ok(&self.records[handle]);
        }

        let slot = &self.records[handle];
        let mut record = if update {
            if !slot.used {
                return Err(TextureError::NotLoaded { handle });
            }
            let mut record = slot.clone();
            record.flags.insert(flags);
            record
        } else {
            TextureRecord::fresh(handle, name, flags)
        };

        prepare_image(&mut record, &mut image);
        if let Err(err) = self.upload_into(device, &mut record, &image) {
            if !update {
                self.records[handle] = TextureRecord::fresh(handle, name, flags);
            }
            return Err(err);
        }

        self.records[handle] = record;
        Ok(&self.records[handle])
    }

    fn upload_into(
        &mut self,
        device: &mut dyn TextureDevice,
        record: &mut TextureRecord,
        image: &SourceImage,
    ) -> Result<(), TextureError> {
        match upload_texture(device, record, image, &self.settings, &mut self.scratch) {
            Ok(outcome) => {
                self.stats.uploads += 1;
                self.stats.device_errors += outcome.device_errors;
                apply_texture_params(device, record, &self.settings);
                Ok(())
            }
            Err(err) => {
                self.stats.failed_uploads += 1;
                Err(err)
            }
        }
    }

    /// Creates a 2D (or cubemap) texture from raw RGBA texels, or empty
    /// storage when `pixels` is `None`.
    ///
    /// Texels are 4 components of 1, 2 (`HALF_FLOAT`) or 4 (`FLOAT`) bytes.
    /// `UPDATE` in `flags` re-uploads an existing texture.
    #[allow(clippy::too_many_arguments)]
    pub fn create_texture(
        &mut self,
        device: &mut dyn TextureDevice,
        handle: usize,
        name: &str,
        width: u32,
        height: u32,
        pixels: Option<&[u8]>,
        flags: TextureFlags,
    ) -> Result<&TextureRecord, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions);
        }
        let update = flags.contains(TextureFlags::UPDATE);
        let flags = flags - (TextureFlags::UPDATE | TextureFlags::TEXTURE_3D);

        let mut image_flags = ImageFlags::empty();
        if !flags.intersects(TextureFlags::LUMINANCE | TextureFlags::ALPHA_CONTRAST) {
            image_flags.insert(ImageFlags::HAS_COLOR);
        }
        if flags.contains(TextureFlags::HAS_ALPHA) {
            image_flags.insert(ImageFlags::HAS_ALPHA);
        }

        let texel_bytes = 4 * transfer_data_type(flags).size();
        let mut size = width as usize * height as usize * texel_bytes;
        if flags.contains(TextureFlags::CUBEMAP) {
            if !device.capabilities().supports(DeviceFeatures::CUBEMAP) {
                log::error!("{name}: cubemaps are not supported, skipping");
                return Err(TextureError::UnsupportedTarget {
                    name: name.to_owned(),
                    requested: TextureTarget::TextureCube,
                });
            }
            image_flags.insert(ImageFlags::CUBEMAP);
            size *= 6;
        }

        let image = SourceImage {
            buffer: pixels.map(<[u8]>::to_vec),
            size,
            flags: image_flags,
            ..SourceImage::empty(PixelFormat::Rgba32, width, height, 1)
        };
        self.load(device, handle, name, image, flags, update)
    }

    /// Creates a texture array, or a volume texture when `TEXTURE_3D` is set.
    #[allow(clippy::too_many_arguments)]
    pub fn create_texture_array(
        &mut self,
        device: &mut dyn TextureDevice,
        handle: usize,
        name: &str,
        width: u32,
        height: u32,
        depth: u32,
        pixels: Option<&[u8]>,
        flags: TextureFlags,
    ) -> Result<&TextureRecord, TextureError> {
        let (width, height, depth) = (width.max(1), height.max(1), depth.max(1));
        let flags =
            flags - (TextureFlags::CUBEMAP | TextureFlags::HAS_LUMA | TextureFlags::ALPHA_CONTRAST);

        let mut image_flags = ImageFlags::empty();
        if !flags.contains(TextureFlags::LUMINANCE) {
            image_flags.insert(ImageFlags::HAS_COLOR);
        }
        if flags.contains(TextureFlags::HAS_ALPHA) {
            image_flags.insert(ImageFlags::HAS_ALPHA);
        }

        let caps = device.capabilities();
        let (feature, requested) = if flags.contains(TextureFlags::TEXTURE_3D) {
            (DeviceFeatures::TEXTURE_3D, TextureTarget::Texture3D)
        } else {
            image_flags.insert(ImageFlags::MULTILAYER);
            (DeviceFeatures::ARRAY, TextureTarget::TextureArray)
        };
        if !caps.supports(feature) {
            log::error!("{name}: {requested} textures are not supported, skipping");
            return Err(TextureError::UnsupportedTarget {
                name: name.to_owned(),
                requested,
            });
        }

        let texel_bytes = 4 * transfer_data_type(flags).size();
        let image = SourceImage {
            buffer: pixels.map(<[u8]>::to_vec),
            size: width as usize * height as usize * depth as usize * texel_bytes,
            flags: image_flags,
            ..SourceImage::empty(PixelFormat::Rgba32, width, height, depth)
        };
        self.load(device, handle, name, image, flags, false)
    }

    /// Frees the slot and releases the device texture. Deleting a free slot
    /// does nothing.
    pub fn delete(
        &mut self,
        device: &mut dyn TextureDevice,
        handle: usize,
    ) -> Result<(), TextureError> {
        self.check_handle(handle)?;
        if self.records[handle].used {
            self.records[handle] = TextureRecord::free(handle);
            device.delete(handle);
        }
        Ok(())
    }

    /// Re-clamps the dimensions of a used texture for its target and
    /// recomputes its resident size across every side and level.
    pub fn update_texture_size(
        &mut self,
        caps: &DeviceCaps,
        handle: usize,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<&TextureRecord, TextureError> {
        self.check_handle(handle)?;
        let round_down = self.settings.round_down;
        let record = &mut self.records[handle];
        if !record.used {
            return Err(TextureError::NotLoaded { handle });
        }

        let extent = clamp_dimensions(
            record.target,
            width,
            height,
            depth,
            &caps.limits,
            caps.supports(DeviceFeatures::NPOT),
            round_down,
        );
        record.width = extent.width;
        record.height = extent.height;
        record.depth = extent.depth;

        let level_bytes: usize = (0..record.mip_count.max(1))
            .map(|level| {
                let mip = extent.mip(level);
                texture_size(record.internal_format, mip.width, mip.height, mip.depth)
            })
            .sum();
        record.byte_size = level_bytes * record.side_count();
        Ok(&*record)
    }

    /// Re-uploads a texture from a transformed copy of its retained source.
    ///
    /// Needs a texture loaded with `KEEP_SOURCE` from an uncompressed image.
    /// The retained source itself is not modified.
    pub fn reprocess_with<F>(
        &mut self,
        device: &mut dyn TextureDevice,
        handle: usize,
        transform: F,
    ) -> Result<&TextureRecord, TextureError>
    where
        F: FnOnce(&mut SourceImage) -> Result<(), TextureError>,
    {
        let record = self.get(handle)?;
        let reprocess_error = |reason: &str| TextureError::Reprocess {
            name: record.name.clone(),
            reason: reason.to_owned(),
        };
        let mut image = match &record.original {
            None => return Err(reprocess_error("no source image kept")),
            Some(original) if original.format.is_compressed() => {
                return Err(reprocess_error("source image is compressed"))
            }
            Some(original) => original.clone(),
        };

        let mut record = record.clone();
        transform(&mut image)?;
        self.upload_into(device, &mut record, &image)?;
        self.records[handle] = record;
        Ok(&self.records[handle])
    }

    /// Sum of the resident sizes of every used texture.
    pub fn total_resident_bytes(&self) -> usize {
        self.records().map(|record| record.byte_size).sum()
    }

    pub fn texture_list(&self) -> TextureListReport {
        TextureListReport::from_records(&self.records)
    }

    /// Replaces the settings, clamped into the device's range, and reapplies
    /// sampler state to every uploaded texture.
    pub fn set_texture_parameters(
        &mut self,
        device: &mut dyn TextureDevice,
        mut settings: TextureSettings,
    ) {
        settings.clamp_to_device(device.capabilities());
        self.settings = settings;
        for record in self.records.iter_mut().filter(|r| r.used && r.is_uploaded()) {
            apply_texture_params(device, record, &self.settings);
        }
    }

    /// The handle to bind for `handle`: itself when valid, otherwise the
    /// default texture.
    pub fn resolve_bind(&self, handle: usize) -> usize {
        if handle == 0 || handle >= self.records.len() {
            if handle != 0 {
                log::warn!("invalid texture handle {handle}, binding the default texture");
            }
            return self.default_texture;
        }
        handle
    }

    /// Binds `handle`, or the default texture in its place.
    pub fn bind(&self, device: &mut dyn TextureDevice, handle: usize) {
        let handle = self.resolve_bind(handle);
        let target = self
            .records
            .get(handle)
            .map_or(TextureTarget::None, |record| record.target);
        device.bind(target, handle);
    }

    /// Zeroes every slot. Device textures are not released; use this when the
    /// device itself has been recreated.
    pub fn reset(&mut self) {
        let capacity = self.records.len();
        self.records = (0..capacity).map(TextureRecord::free).collect();
        self.stats = RegistryStats::default();
        log::info!("texture registry reset ({capacity} slots)");
    }
}

/// Carries image properties over to the record before an upload.
fn prepare_image(record: &mut TextureRecord, image: &mut SourceImage) {
    if record.flags.contains(TextureFlags::FORCE_COLOR) {
        image.flags.insert(ImageFlags::HAS_COLOR);
    }
    if image.flags.contains(ImageFlags::HAS_ALPHA) {
        record.flags.insert(TextureFlags::HAS_ALPHA);
    }
    record.encode = image.encode;

    if image.format.is_compressed() {
        if image.mip_count == 0 {
            record.flags.insert(TextureFlags::NOMIPMAP);
        }
        record.flags.remove(TextureFlags::KEEP_SOURCE);
        return;
    }

    if image.flags.contains(ImageFlags::HAS_LUMA) {
        record.flags.insert(TextureFlags::HAS_LUMA);
    }
    if !record.is_uploaded() && record.flags.contains(TextureFlags::KEEP_SOURCE) {
        record.original = Some(image.clone());
    }
    if record.flags.contains(TextureFlags::LUMINANCE) {
        image.flags.remove(ImageFlags::HAS_COLOR);
    }
}

fn apply_texture_params(
    device: &mut dyn TextureDevice,
    record: &mut TextureRecord,
    settings: &TextureSettings,
) {
    let caps = device.capabilities();
    record.flags = normalize_wrap_flags(record.flags, record.target, caps);
    record.sampler = sampler_state(record.flags, record.target, record.mip_count, settings, caps);
    if let Some(sampler) = &record.sampler {
        device.apply_sampler(record.handle, record.target, sampler);
    }
}
