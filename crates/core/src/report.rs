//! Resident texture listing.

use std::fmt;

use serde::Serialize;

use crate::flags::TextureFlags;
use crate::format::InternalFormat;
use crate::pixel_format::EncodeMethod;
use crate::record::TextureRecord;
use crate::sampler::wrap_label;
use crate::target::TextureTarget;

const KB: usize = 1024;
const MB: usize = KB * 1024;
const GB: usize = MB * 1024;

/// Human-readable byte count: plain bytes below 1 Kb, otherwise two decimals.
pub fn format_bytes(bytes: usize) -> String {
    let b = bytes as f64;
    if bytes >= GB {
        format!("{:.2} Gb", b / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} Mb", b / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} Kb", b / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureListEntry {
    pub handle: usize,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub byte_size: usize,
    pub memory: String,
    pub internal_format: InternalFormat,
    pub target: TextureTarget,
    pub normal_map: bool,
    pub encode: EncodeMethod,
    pub wrap: &'static str,
    pub name: String,
}

impl From<&TextureRecord> for TextureListEntry {
    fn from(record: &TextureRecord) -> Self {
        Self {
            handle: record.handle,
            width: record.width,
            height: record.height,
            depth: record.depth,
            byte_size: record.byte_size,
            memory: format_bytes(record.byte_size),
            internal_format: record.internal_format,
            target: record.target,
            normal_map: record.flags.contains(TextureFlags::NORMALMAP),
            encode: record.encode,
            wrap: wrap_label(record.flags).trim_end(),
            name: record.name.clone(),
        }
    }
}

/// Every used slot plus totals. `Display` renders the console table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextureListReport {
    pub entries: Vec<TextureListEntry>,
    pub total_textures: usize,
    pub total_bytes: usize,
    pub total_memory: String,
}

impl TextureListReport {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TextureRecord>) -> Self {
        let entries: Vec<TextureListEntry> = records
            .into_iter()
            .filter(|record| record.used)
            .map(TextureListEntry::from)
            .collect();
        let total_bytes = entries.iter().map(|entry| entry.byte_size).sum();
        Self {
            total_textures: entries.len(),
            total_bytes,
            total_memory: format_bytes(total_bytes),
            entries,
        }
    }
}

impl fmt::Display for TextureListReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " -id-   -w-  -h-     -size- -fmt- -type- -data-  -encode- -wrap- -depth- -name--------"
        )?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:4}: {:4} {:4} {:>12} {}{}{}{}{:<7}   {}    {}",
                entry.handle,
                entry.width,
                entry.height,
                entry.memory,
                entry.internal_format.label(),
                entry.target.list_label(),
                if entry.normal_map { "normal  " } else { "diffuse " },
                entry.encode.label(),
                entry.wrap,
                entry.depth,
                entry.name,
            )?;
        }
        writeln!(f, "---------------------------------------------------------")?;
        writeln!(f, "{} total textures", self.total_textures)?;
        writeln!(f, "{} total memory used", self.total_memory)
    }
}
