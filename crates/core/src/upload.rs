//! Upload orchestration: resolve, plan, then commit every side and level.
//!
//! The work is split so that everything that can fail on bad input happens
//! before the first device call:
//!
//! 1. [`resolve_texture`] picks target, dimensions and storage format.
//! 2. [`plan_upload`] lays out every side and level and checks each byte range
//!    against the image buffer.
//! 3. [`upload_texture`] writes the resolved state into the record and drives
//!    the device, resampling, filtering and generating levels on the way.
//!
//! Device-reported errors are only detected after a level is committed; they
//! are logged and counted, and the upload carries on.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::caps::{DeviceCaps, DeviceFeatures};
use crate::device::{Payload, StorageMode, TextureDevice, UploadCommand};
use crate::dimensions::{clamp_dimensions, Extent};
use crate::edge_filter::apply_edge_filter;
use crate::error::TextureError;
use crate::flags::{ImageFlags, TextureFlags};
use crate::format::{select_format, texture_size, transfer_data_type, InternalFormat};
use crate::image::SourceImage;
use crate::mipmap::{fill_alpha_contrast, halve_rgba8, mip_count};
use crate::pixel_format::{image_size, DataType, PixelFormat, TransferFormat};
use crate::record::TextureRecord;
use crate::resample::resample_rgba8;
use crate::settings::TextureSettings;
use crate::target::{classify_target, resolve_target, TextureTarget};

/// Where an upload is in its lifecycle; used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    Unconfigured,
    TargetResolved,
    FormatResolved,
    Uploading { side: u32, level: u32 },
    Complete,
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStage::Unconfigured => f.write_str("unconfigured"),
            UploadStage::TargetResolved => f.write_str("target resolved"),
            UploadStage::FormatResolved => f.write_str("format resolved"),
            UploadStage::Uploading { side, level } => write!(f, "side {side} level {level}"),
            UploadStage::Complete => f.write_str("complete"),
            UploadStage::Failed => f.write_str("failed"),
        }
    }
}

/// Target, dimensions and storage format chosen for an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedTexture {
    pub target: TextureTarget,
    pub source_width: u32,
    pub source_height: u32,
    pub extent: Extent,
    pub internal_format: InternalFormat,
}

/// Resolves target, dimensions and storage format. Touches no state.
pub fn resolve_texture(
    name: &str,
    image: &SourceImage,
    flags: TextureFlags,
    settings: &TextureSettings,
    caps: &DeviceCaps,
) -> Result<ResolvedTexture, TextureError> {
    let depth = image.depth.max(1);
    let requested = classify_target(image.width, image.height, depth, image.flags, flags);
    let target = resolve_target(requested, flags, caps);
    if target == TextureTarget::None {
        log::error!("{name}: {requested} textures are not supported, skipping");
        return Err(TextureError::UnsupportedTarget {
            name: name.to_owned(),
            requested,
        });
    }
    log::debug!("{name}: {} ({requested} requested)", UploadStage::TargetResolved);

    if image.format.is_bptc() && !caps.supports(DeviceFeatures::BPTC) {
        log::error!("{name}: {:?} needs BPTC support, skipping", image.format);
        return Err(TextureError::UnsupportedCompressionFormat {
            name: name.to_owned(),
            format: image.format,
        });
    }

    let extent = clamp_dimensions(
        target,
        image.width,
        image.height,
        depth,
        &caps.limits,
        caps.supports(DeviceFeatures::NPOT),
        settings.round_down,
    );
    let internal_format = select_format(image.format, image.flags, flags, caps);
    log::debug!(
        "{name}: {} {target} {}x{}x{} {internal_format:?}",
        UploadStage::FormatResolved,
        extent.width,
        extent.height,
        extent.depth
    );

    Ok(ResolvedTexture {
        target,
        source_width: image.width,
        source_height: image.height,
        extent,
        internal_format,
    })
}

/// How the levels of an upload are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPath {
    /// Block-compressed levels taken from the image as they are.
    Compressed,
    /// Uncompressed levels already present in the image.
    PreMipped,
    /// One level taken from the image, the rest generated here.
    Generated,
}

/// One level of one side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelPlan {
    pub level: u32,
    pub extent: Extent,
    /// Resident size on the device.
    pub texture_bytes: usize,
    /// Bytes handed to the device for this level.
    pub source_bytes: usize,
    /// Range of the image buffer holding this level, when it is read as is.
    pub data: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidePlan {
    pub side: u32,
    /// Range of the image buffer the generated levels start from.
    pub base: Option<Range<usize>>,
    pub levels: Vec<LevelPlan>,
}

/// Everything needed to commit an image, validated against its buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadPlan {
    pub resolved: ResolvedTexture,
    pub path: UploadPath,
    pub mode: StorageMode,
    pub transfer: TransferFormat,
    pub data_type: DataType,
    pub samples: u32,
    pub resample: bool,
    pub edge_filter: bool,
    pub normal_map: bool,
    pub legacy_alpha_contrast: bool,
    pub sides: Vec<SidePlan>,
}

impl UploadPlan {
    pub fn total_texture_bytes(&self) -> usize {
        self.sides
            .iter()
            .flat_map(|side| &side.levels)
            .map(|level| level.texture_bytes)
            .sum()
    }

    pub fn levels_per_side(&self) -> usize {
        self.sides.first().map_or(0, |side| side.levels.len())
    }
}

/// Advances through the image buffer, refusing to step past its end.
struct Cursor<'a> {
    name: &'a str,
    offset: usize,
    available: usize,
}

impl Cursor<'_> {
    fn take(&mut self, len: usize, side: u32, level: u32) -> Result<Range<usize>, TextureError> {
        let end = self.offset + len;
        if end > self.available {
            log::error!(
                "{}: image buffer overrun at side {side} level {level}",
                self.name
            );
            return Err(TextureError::SourceBufferOverrun {
                name: self.name.to_owned(),
                stage: UploadStage::Uploading { side, level },
                needed: end,
                available: self.available,
            });
        }
        let range = self.offset..end;
        self.offset = end;
        Ok(range)
    }
}

fn is_rgba8(format: PixelFormat, data_type: DataType) -> bool {
    matches!(format, PixelFormat::Rgba32 | PixelFormat::Bgra32) && data_type == DataType::UnsignedByte
}

/// Lays out every side and level of an upload and checks that the image
/// buffer covers all of them. Touches no state.
pub fn plan_upload(
    name: &str,
    image: &SourceImage,
    resolved: ResolvedTexture,
    flags: TextureFlags,
    settings: &TextureSettings,
    caps: &DeviceCaps,
) -> Result<UploadPlan, TextureError> {
    let extent = resolved.extent;
    let data_type = transfer_data_type(flags);
    let has_data = image.has_data();
    let side_count: u32 = if image.flags.contains(ImageFlags::CUBEMAP) {
        6
    } else {
        1
    };
    let mut cursor = Cursor {
        name,
        offset: 0,
        available: image.readable_len(),
    };

    let path = if image.format.is_compressed() {
        UploadPath::Compressed
    } else if image.mip_count.max(1) > 1 {
        UploadPath::PreMipped
    } else {
        UploadPath::Generated
    };

    let level_bytes = |mip: Extent| {
        let packed = image_size(image.format, mip.width, mip.height, mip.depth);
        match path {
            UploadPath::Compressed => packed,
            _ => packed * data_type.size(),
        }
    };

    let rgba8 = is_rgba8(image.format, data_type);
    let resample = path == UploadPath::Generated
        && has_data
        && extent.depth == 1
        && (image.width != extent.width || image.height != extent.height);
    if resample && !rgba8 {
        return Err(TextureError::InvalidImage(format!(
            "{name}: {:?} data cannot be resampled from {}x{} to {}x{}",
            image.format, image.width, image.height, extent.width, extent.height
        )));
    }

    let mut generated_levels = mip_count(extent, flags, resolved.target, has_data);
    if path == UploadPath::Generated && generated_levels > 1 && !rgba8 {
        log::debug!("{name}: {:?} data gets no generated mips", image.format);
        generated_levels = 1;
    }

    let edge_filter = path == UploadPath::Generated
        && has_data
        && rgba8
        && !flags.contains(TextureFlags::NOMIPMAP)
        && image.flags.contains(ImageFlags::ONEBIT_ALPHA)
        && !settings.quake_compatible
        && caps.limits.max_multisamples <= 1;

    let mut sides = Vec::with_capacity(side_count as usize);
    for side in 0..side_count {
        let mut plan = SidePlan {
            side,
            base: None,
            levels: Vec::new(),
        };

        let level_count = match path {
            UploadPath::Compressed | UploadPath::PreMipped => image.mip_count.max(1),
            UploadPath::Generated => generated_levels,
        };

        if path == UploadPath::Generated && has_data {
            // A resampled base reads the whole source image; otherwise the
            // base level is read at the allocated size.
            let base_len = if resample {
                image_size(image.format, image.width, image.height, 1) * data_type.size()
            } else {
                level_bytes(extent)
            };
            let start = cursor.offset;
            plan.base = Some(cursor.take(base_len, side, 0)?);
            let side_len = image_size(image.format, image.width, image.height, 1) * data_type.size();
            cursor.offset = start + side_len;
        }

        for level in 0..level_count {
            let mip = extent.mip(level);
            let source_bytes = level_bytes(mip);
            let data = match path {
                UploadPath::Generated => None,
                _ if has_data => Some(cursor.take(source_bytes, side, level)?),
                _ => None,
            };
            plan.levels.push(LevelPlan {
                level,
                extent: mip,
                texture_bytes: texture_size(resolved.internal_format, mip.width, mip.height, mip.depth),
                source_bytes,
                data,
            });
        }
        sides.push(plan);
    }

    let transfer = if flags.contains(TextureFlags::DEPTHMAP) {
        TransferFormat::DepthComponent
    } else {
        image.format.transfer_format()
    };
    let samples = if resolved.target == TextureTarget::TextureMultisample {
        settings.multisample_count()
    } else {
        0
    };

    Ok(UploadPlan {
        resolved,
        path,
        mode: if flags.contains(TextureFlags::UPLOADED) {
            StorageMode::Update
        } else {
            StorageMode::Define
        },
        transfer,
        data_type,
        samples,
        resample,
        edge_filter,
        normal_map: flags.contains(TextureFlags::NORMALMAP),
        legacy_alpha_contrast: settings.legacy_alpha_contrast_mips
            && flags.contains(TextureFlags::ALPHA_CONTRAST),
        sides,
    })
}

/// Reusable pixel buffers for resampling and level generation.
#[derive(Debug, Default)]
pub struct ScratchBuffers {
    work: Vec<u8>,
    spare: Vec<u8>,
}

/// What happened during a successful upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub levels_committed: usize,
    pub device_errors: usize,
}

struct Committer<'a> {
    device: &'a mut dyn TextureDevice,
    plan: &'a UploadPlan,
    handle: usize,
    check_errors: bool,
    outcome: UploadOutcome,
}

impl Committer<'_> {
    fn commit(&mut self, record: &mut TextureRecord, side: u32, level: &LevelPlan, data: Option<&[u8]>) {
        let payload = match self.plan.path {
            UploadPath::Compressed => Payload::Compressed {
                size: level.source_bytes,
                data,
            },
            _ => Payload::Raw {
                format: self.plan.transfer,
                data_type: self.plan.data_type,
                data,
            },
        };
        self.device.upload(&UploadCommand {
            handle: self.handle,
            target: self.plan.resolved.target,
            side,
            level: level.level,
            width: level.extent.width,
            height: level.extent.height,
            depth: level.extent.depth,
            internal_format: self.plan.resolved.internal_format,
            mode: self.plan.mode,
            samples: self.plan.samples,
            payload,
        });
        record.byte_size += level.texture_bytes;
        record.mip_count += 1;
        self.outcome.levels_committed += 1;

        if self.check_errors {
            if let Some(code) = self.device.take_error() {
                let err = TextureError::DeviceUpload {
                    name: record.name.clone(),
                    target: record.target,
                    code,
                };
                log::error!("{err}");
                self.outcome.device_errors += 1;
            }
        }
    }
}

/// Uploads `image` into `record`.
///
/// On error nothing has been written to the record or the device.
pub fn upload_texture(
    device: &mut dyn TextureDevice,
    record: &mut TextureRecord,
    image: &SourceImage,
    settings: &TextureSettings,
    scratch: &mut ScratchBuffers,
) -> Result<UploadOutcome, TextureError> {
    let caps = device.capabilities().clone();
    let name = record.name.clone();

    let resolved = resolve_texture(&name, image, record.flags, settings, &caps)?;
    let plan = plan_upload(&name, image, resolved, record.flags, settings, &caps)?;

    record.target = resolved.target;
    record.source_width = resolved.source_width;
    record.source_height = resolved.source_height;
    record.width = resolved.extent.width;
    record.height = resolved.extent.height;
    record.depth = resolved.extent.depth;
    record.internal_format = resolved.internal_format;
    record.fog_params = image.fog_params;
    record.byte_size = 0;
    record.mip_count = 0;

    device.bind(resolved.target, record.handle);

    let buffer = image.buffer.as_deref().unwrap_or(&[]);
    let mut committer = Committer {
        device,
        plan: &plan,
        handle: record.handle,
        check_errors: settings.check_errors,
        outcome: UploadOutcome::default(),
    };

    for side in &plan.sides {
        match (&side.base, plan.path) {
            (Some(base), UploadPath::Generated) => {
                commit_generated(&mut committer, record, image, side, &buffer[base.clone()], scratch)?;
            }
            _ => {
                for level in &side.levels {
                    log::debug!("{name}: {}", UploadStage::Uploading { side: side.side, level: level.level });
                    let data = level.data.clone().map(|range| &buffer[range]);
                    committer.commit(record, side.side, level, data);
                }
            }
        }
    }

    let outcome = committer.outcome;
    record.flags.insert(TextureFlags::UPLOADED);
    record.mip_count /= plan.sides.len().max(1) as u32;
    log::debug!("{name}: {} ({} bytes)", UploadStage::Complete, record.byte_size);

    Ok(outcome)
}

fn commit_generated(
    committer: &mut Committer<'_>,
    record: &mut TextureRecord,
    image: &SourceImage,
    side: &SidePlan,
    base: &[u8],
    scratch: &mut ScratchBuffers,
) -> Result<(), TextureError> {
    let plan = committer.plan;
    let extent = plan.resolved.extent;

    // A single untouched level goes straight from the source buffer.
    if !plan.resample && !plan.edge_filter && side.levels.len() <= 1 {
        for level in &side.levels {
            committer.commit(record, side.side, level, Some(&base[..level.source_bytes]));
        }
        return Ok(());
    }

    let ScratchBuffers { work, spare } = scratch;
    if plan.resample {
        log::debug!(
            "{}: resampling {}x{} to {}x{}",
            record.name,
            image.width,
            image.height,
            extent.width,
            extent.height
        );
        resample_rgba8(
            base,
            image.width,
            image.height,
            extent.width,
            extent.height,
            plan.normal_map,
            work,
        )?;
    } else {
        work.clear();
        work.extend_from_slice(base);
    }

    if plan.edge_filter {
        apply_edge_filter(work, extent.width, extent.height);
    }

    let last = side.levels.len().saturating_sub(1);
    for (i, level) in side.levels.iter().enumerate() {
        committer.commit(record, side.side, level, Some(&work[..level.source_bytes]));
        if i < last {
            if plan.legacy_alpha_contrast {
                fill_alpha_contrast(level.extent, spare);
            } else {
                halve_rgba8(work, level.extent, plan.normal_map, spare)?;
            }
            std::mem::swap(work, spare);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::DeviceLimits;
    use crate::device::{RecordingDevice, StorageMode};
    use crate::pixel_format::EncodeMethod;

    fn pot_caps() -> DeviceCaps {
        DeviceCaps::full().without(DeviceFeatures::NPOT)
    }

    fn settings() -> TextureSettings {
        TextureSettings {
            round_down: 0,
            ..TextureSettings::default()
        }
    }

    fn rgba(width: u32, height: u32, color: [u8; 4]) -> SourceImage {
        SourceImage::rgba8(
            width,
            height,
            color.repeat((width * height) as usize),
            ImageFlags::HAS_COLOR | ImageFlags::HAS_ALPHA,
        )
    }

    fn run(
        device: &mut RecordingDevice,
        flags: TextureFlags,
        image: &SourceImage,
    ) -> Result<TextureRecord, TextureError> {
        let mut record = TextureRecord::fresh(5, "test", flags);
        upload_texture(device, &mut record, image, &settings(), &mut ScratchBuffers::default())?;
        Ok(record)
    }

    #[test]
    fn npot_image_rounds_up_and_builds_full_chain() {
        let mut device = RecordingDevice::new(pot_caps());
        let record = run(&mut device, TextureFlags::empty(), &rgba(17, 9, [10, 20, 30, 255])).unwrap();

        assert_eq!((record.width, record.height, record.depth), (32, 16, 1));
        assert_eq!((record.source_width, record.source_height), (17, 9));
        assert_eq!(record.mip_count, 6);
        assert_eq!(record.internal_format, InternalFormat::Rgba8);
        let expected: usize = [(32, 16), (16, 8), (8, 4), (4, 2), (2, 1), (1, 1)]
            .iter()
            .map(|(w, h)| 4 * w * h)
            .sum();
        assert_eq!(record.byte_size, expected);
        assert_eq!(record.byte_size, 2732);
        assert!(record.is_uploaded());

        let levels: Vec<_> = device.uploads().map(|u| (u.level, u.width, u.height)).collect();
        assert_eq!(levels.first(), Some(&(0, 32, 16)));
        assert_eq!(levels.last(), Some(&(5, 1, 1)));
        for upload in device.uploads() {
            let data = upload.data.as_ref().unwrap();
            assert_eq!(data.len(), (upload.width * upload.height * 4) as usize);
            assert!(data.chunks_exact(4).all(|t| t == [10, 20, 30, 255]));
        }
    }

    #[test]
    fn first_upload_defines_and_second_updates() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let image = rgba(4, 4, [1, 2, 3, 4]);
        let mut record = TextureRecord::fresh(2, "twice", TextureFlags::NOMIPMAP);
        let mut scratch = ScratchBuffers::default();
        upload_texture(&mut device, &mut record, &image, &settings(), &mut scratch).unwrap();
        upload_texture(&mut device, &mut record, &image, &settings(), &mut scratch).unwrap();

        let modes: Vec<_> = device.uploads().map(|u| u.mode).collect();
        assert_eq!(modes, vec![StorageMode::Define, StorageMode::Update]);
        assert_eq!(record.byte_size, 64);
        assert_eq!(record.mip_count, 1);
    }

    #[test]
    fn unsupported_target_leaves_record_and_device_untouched() {
        let mut device = RecordingDevice::new(DeviceCaps::full().without(DeviceFeatures::CUBEMAP));
        let mut image = rgba(4, 4, [0; 4]);
        image.flags.insert(ImageFlags::CUBEMAP);
        let mut record = TextureRecord::fresh(1, "sky", TextureFlags::empty());
        let before = record.clone();

        let err = upload_texture(
            &mut device,
            &mut record,
            &image,
            &settings(),
            &mut ScratchBuffers::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TextureError::UnsupportedTarget {
                requested: TextureTarget::TextureCube,
                ..
            }
        ));
        assert_eq!(record, before);
        assert!(device.calls().is_empty());
    }

    #[test]
    fn bptc_without_support_is_rejected() {
        let mut device = RecordingDevice::new(DeviceCaps::full().without(DeviceFeatures::BPTC));
        let image = SourceImage {
            buffer: Some(vec![0; 16]),
            size: 16,
            mip_count: 1,
            ..SourceImage::empty(PixelFormat::Bc7, 4, 4, 1)
        };
        let err = run(&mut device, TextureFlags::empty(), &image).unwrap_err();
        assert!(matches!(err, TextureError::UnsupportedCompressionFormat { .. }));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn compressed_chain_uses_image_levels() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        // 8x8 DXT5: 64 + 16 + 16 + 16 bytes over 4 levels.
        let image = SourceImage {
            buffer: Some(vec![7; 112]),
            size: 112,
            mip_count: 4,
            flags: ImageFlags::HAS_COLOR | ImageFlags::HAS_ALPHA,
            ..SourceImage::empty(PixelFormat::Dxt5, 8, 8, 1)
        };
        let record = run(&mut device, TextureFlags::empty(), &image).unwrap();

        assert_eq!(record.internal_format, InternalFormat::Dxt5);
        assert_eq!(record.mip_count, 4);
        assert_eq!(record.byte_size, 112);
        let sizes: Vec<_> = device
            .uploads()
            .map(|u| (u.compressed, u.data.as_ref().map(Vec::len)))
            .collect();
        assert_eq!(
            sizes,
            vec![(true, Some(64)), (true, Some(16)), (true, Some(16)), (true, Some(16))]
        );
    }

    #[test]
    fn short_declared_size_is_an_overrun_before_any_device_call() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let image = SourceImage {
            buffer: Some(vec![0; 112]),
            size: 100,
            mip_count: 4,
            ..SourceImage::empty(PixelFormat::Dxt5, 8, 8, 1)
        };
        let err = run(&mut device, TextureFlags::empty(), &image).unwrap_err();
        match err {
            TextureError::SourceBufferOverrun {
                stage,
                needed,
                available,
                ..
            } => {
                assert_eq!(stage, UploadStage::Uploading { side: 0, level: 3 });
                assert_eq!(needed, 112);
                assert_eq!(available, 100);
            }
            other => panic!("expected overrun, got {other:?}"),
        }
        assert!(device.calls().is_empty());
    }

    #[test]
    fn cubemap_faces_advance_through_the_buffer() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let mut pixels = Vec::new();
        for face in 0..6u8 {
            pixels.extend([face, face, face, 255].repeat(4));
        }
        let mut image = SourceImage::rgba8(2, 2, pixels, ImageFlags::HAS_COLOR | ImageFlags::CUBEMAP);
        image.mip_count = 1;
        let record = run(&mut device, TextureFlags::NOMIPMAP, &image).unwrap();

        assert_eq!(record.target, TextureTarget::TextureCube);
        assert_eq!(record.mip_count, 1);
        assert_eq!(record.byte_size, 6 * 2 * 2 * 4);
        let faces: Vec<_> = device
            .uploads()
            .map(|u| (u.side, u.data.as_ref().map(|d| d[0])))
            .collect();
        let expected: Vec<_> = (0..6u32).map(|f| (f, Some(f as u8))).collect();
        assert_eq!(faces, expected);
    }

    #[test]
    fn truncated_cubemap_is_an_overrun() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let image = SourceImage::rgba8(
            2,
            2,
            vec![0; 16 * 5],
            ImageFlags::HAS_COLOR | ImageFlags::CUBEMAP,
        );
        let err = run(&mut device, TextureFlags::NOMIPMAP, &image).unwrap_err();
        assert!(matches!(
            err,
            TextureError::SourceBufferOverrun {
                stage: UploadStage::Uploading { side: 5, level: 0 },
                ..
            }
        ));
    }

    #[test]
    fn empty_storage_uploads_every_level_without_data() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let image = SourceImage {
            flags: ImageFlags::HAS_COLOR,
            ..SourceImage::empty(PixelFormat::Rgba32, 64, 64, 1)
        };
        let record = run(&mut device, TextureFlags::empty(), &image).unwrap();
        // Without data no chain is generated.
        assert_eq!(record.mip_count, 1);
        assert!(device.uploads().all(|u| u.data.is_none()));
    }

    #[test]
    fn edge_filter_runs_on_one_bit_alpha() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let mut pixels = [200, 100, 50, 255].repeat(9);
        pixels[16..20].copy_from_slice(&[0, 0, 0, 0]);
        let image = SourceImage::rgba8(
            3,
            3,
            pixels,
            ImageFlags::HAS_COLOR | ImageFlags::HAS_ALPHA | ImageFlags::ONEBIT_ALPHA,
        );
        run(&mut device, TextureFlags::empty(), &image).unwrap();
        let base = device.uploads().next().unwrap().data.clone().unwrap();
        assert_eq!(&base[16..20], &[200, 100, 50, 0]);
    }

    #[test]
    fn edge_filter_is_skipped_in_compatibility_mode_and_with_msaa() {
        let mut pixels = [200, 100, 50, 255].repeat(9);
        pixels[16..20].copy_from_slice(&[0, 0, 0, 0]);
        let image = SourceImage::rgba8(
            3,
            3,
            pixels,
            ImageFlags::HAS_COLOR | ImageFlags::HAS_ALPHA | ImageFlags::ONEBIT_ALPHA,
        );

        let compat = TextureSettings {
            quake_compatible: true,
            ..settings()
        };
        let msaa_caps = DeviceCaps {
            limits: DeviceLimits {
                max_multisamples: 4,
                ..DeviceLimits::default()
            },
            ..DeviceCaps::full()
        };

        for (caps, settings) in [(DeviceCaps::full(), compat), (msaa_caps, settings())] {
            let mut device = RecordingDevice::new(caps);
            let mut record = TextureRecord::fresh(1, "fence", TextureFlags::empty());
            upload_texture(&mut device, &mut record, &image, &settings, &mut ScratchBuffers::default())
                .unwrap();
            let base = device.uploads().next().unwrap().data.clone().unwrap();
            assert_eq!(&base[16..20], &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn legacy_alpha_contrast_fills_with_level_width() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let image = rgba(8, 8, [9, 9, 9, 9]);
        let settings = TextureSettings {
            legacy_alpha_contrast_mips: true,
            ..settings()
        };
        let mut record = TextureRecord::fresh(1, "detail", TextureFlags::ALPHA_CONTRAST);
        upload_texture(&mut device, &mut record, &image, &settings, &mut ScratchBuffers::default())
            .unwrap();
        let level1 = device.uploads().nth(1).unwrap().data.clone().unwrap();
        assert!(level1.iter().all(|&b| b == 4));
    }

    #[test]
    fn alpha_contrast_uses_box_filter_by_default() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let image = rgba(8, 8, [9, 9, 9, 9]);
        run(&mut device, TextureFlags::ALPHA_CONTRAST, &image).unwrap();
        let level1 = device.uploads().nth(1).unwrap().data.clone().unwrap();
        assert!(level1.iter().all(|&b| b == 9));
    }

    #[test]
    fn non_rgba_sources_upload_a_single_level() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let image = SourceImage {
            buffer: Some(vec![5; 16]),
            size: 16,
            mip_count: 1,
            ..SourceImage::empty(PixelFormat::Luminance, 4, 4, 1)
        };
        let record = run(&mut device, TextureFlags::empty(), &image).unwrap();
        assert_eq!(record.mip_count, 1);
        assert_eq!(record.internal_format, InternalFormat::Luminance8);
        assert_eq!(device.uploads().count(), 1);
    }

    #[test]
    fn resampling_non_rgba_sources_is_rejected() {
        let mut device = RecordingDevice::new(pot_caps());
        let image = SourceImage {
            buffer: Some(vec![5; 15]),
            size: 15,
            mip_count: 1,
            ..SourceImage::empty(PixelFormat::Luminance, 5, 3, 1)
        };
        let err = run(&mut device, TextureFlags::empty(), &image).unwrap_err();
        assert!(matches!(err, TextureError::InvalidImage(_)));
    }

    #[test]
    fn float_storage_sizes_scale_with_component_size() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let image = SourceImage {
            buffer: Some(vec![0; 4 * 4 * 4 * 4]),
            size: 4 * 4 * 4 * 4,
            mip_count: 1,
            flags: ImageFlags::HAS_COLOR | ImageFlags::HAS_ALPHA,
            ..SourceImage::empty(PixelFormat::Rgba32, 4, 4, 1)
        };
        let record = run(&mut device, TextureFlags::FLOAT, &image).unwrap();
        assert_eq!(record.internal_format, InternalFormat::Rgba32F);
        assert_eq!(record.mip_count, 1);
        let upload = device.uploads().next().unwrap();
        assert_eq!(upload.data.as_ref().map(Vec::len), Some(256));
    }

    #[test]
    fn device_errors_are_counted_not_fatal() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        device.fail_uploads_with(Some(0x0501));
        let mut record = TextureRecord::fresh(3, "broken", TextureFlags::empty());
        let outcome = upload_texture(
            &mut device,
            &mut record,
            &rgba(4, 4, [1; 4]),
            &settings(),
            &mut ScratchBuffers::default(),
        )
        .unwrap();
        assert_eq!(outcome.levels_committed, 3);
        assert_eq!(outcome.device_errors, 3);
        assert!(record.is_uploaded());
    }

    #[test]
    fn multisample_uploads_carry_sample_count() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let settings = TextureSettings {
            msaa_samples: 4,
            ..settings()
        };
        let image = SourceImage {
            flags: ImageFlags::HAS_COLOR,
            ..SourceImage::empty(PixelFormat::Rgba32, 64, 64, 1)
        };
        let mut record = TextureRecord::fresh(4, "msaa", TextureFlags::MULTISAMPLE | TextureFlags::NOMIPMAP);
        upload_texture(&mut device, &mut record, &image, &settings, &mut ScratchBuffers::default())
            .unwrap();
        let upload = device.uploads().next().unwrap();
        assert_eq!(upload.target, TextureTarget::TextureMultisample);
        assert_eq!(upload.samples, 4);
    }

    #[test]
    fn fog_params_pass_through() {
        let mut device = RecordingDevice::new(DeviceCaps::full());
        let mut image = rgba(2, 2, [0; 4]);
        image.fog_params = [0.1, 0.2, 0.3, 0.4];
        image.encode = EncodeMethod::YCoCg;
        let record = run(&mut device, TextureFlags::NOMIPMAP, &image).unwrap();
        assert_eq!(record.fog_params, [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn plan_totals_match_record() {
        let image = rgba(17, 9, [0; 4]);
        let caps = pot_caps();
        let resolved = resolve_texture("p", &image, TextureFlags::empty(), &settings(), &caps).unwrap();
        let plan = plan_upload("p", &image, resolved, TextureFlags::empty(), &settings(), &caps).unwrap();
        assert_eq!(plan.path, UploadPath::Generated);
        assert!(plan.resample);
        assert_eq!(plan.levels_per_side(), 6);
        assert_eq!(plan.total_texture_bytes(), 2732);
    }

    #[test]
    fn stage_display_names_side_and_level() {
        let stage = UploadStage::Uploading { side: 3, level: 1 };
        assert_eq!(stage.to_string(), "side 3 level 1");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn truncated_buffers_never_reach_the_device(
                width in 1u32..33,
                height in 1u32..33,
                cut in 1usize..64,
            ) {
                let full = (width * height * 4) as usize;
                let cut = cut.min(full);
                let image = SourceImage {
                    size: full - cut,
                    ..rgba(width, height, [3; 4])
                };
                let mut device = RecordingDevice::new(DeviceCaps::full());
                let result = run(&mut device, TextureFlags::empty(), &image);
                let is_overrun = matches!(result, Err(TextureError::SourceBufferOverrun { .. }));
                prop_assert!(is_overrun);
                prop_assert!(device.calls().is_empty());
            }

            #[test]
            fn byte_size_equals_planned_total(width in 1u32..70, height in 1u32..70) {
                let image = rgba(width, height, [3; 4]);
                let caps = pot_caps();
                let flags = TextureFlags::empty();
                let resolved = resolve_texture("p", &image, flags, &settings(), &caps).unwrap();
                let plan = plan_upload("p", &image, resolved, flags, &settings(), &caps).unwrap();
                let mut device = RecordingDevice::new(caps);
                let record = run(&mut device, flags, &image).unwrap();
                prop_assert_eq!(record.byte_size, plan.total_texture_bytes());
                prop_assert_eq!(record.mip_count as usize, plan.levels_per_side());
            }
        }
    }
}
