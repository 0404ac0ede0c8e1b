#![deny(unsafe_code)]
//! CLI binary for the texpipe texture pipeline.
//!
//! Runs images through the registry against a headless recording device.
//!
//! Subcommands:
//! - `upload <input>` -- load one image and report the resulting record
//! - `mips <input>` -- load one image and write every uploaded level as PNG
//! - `list <inputs>...` -- load several images and print the texture list
//! - `patterns` -- print available synthetic patterns
//!
//! An input is a PNG path or `pattern:<name>`.

mod error;

use std::path::PathBuf;
use std::process;

use bitflags::Flags;
use clap::{Args, Parser, Subcommand, ValueEnum};
use error::CliError;
use serde_json::Value;
use texpipe_core::device::RecordingDevice;
use texpipe_core::report::format_bytes;
use texpipe_core::{
    DeviceCaps, DeviceFeatures, SourceImage, TextureFlags, TextureRegistry, TextureSettings,
};
use texpipe_io::PatternKind;

#[derive(Parser)]
#[command(name = "texpipe", about = "Texture upload pipeline CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload one image and print the texture record.
    Upload {
        /// PNG path or `pattern:<name>`.
        input: String,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Upload one image and write every committed level as a PNG.
    Mips {
        /// PNG path or `pattern:<name>`.
        input: String,

        /// Output directory.
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Upload several images and print the texture list.
    List {
        /// PNG paths or `pattern:<name>` entries.
        #[arg(required = true)]
        inputs: Vec<String>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// List available synthetic patterns.
    Patterns,
}

#[derive(Clone, Copy, ValueEnum)]
enum CapsPreset {
    Full,
    Minimal,
}

#[derive(Args)]
struct PipelineArgs {
    /// Pattern width in pixels.
    #[arg(short = 'W', long, default_value_t = 64)]
    width: u32,

    /// Pattern height in pixels.
    #[arg(short = 'H', long, default_value_t = 64)]
    height: u32,

    /// Texture flags, comma separated (e.g. "nomipmap,clamp").
    #[arg(short, long, default_value = "")]
    flags: String,

    /// Emulated device capabilities.
    #[arg(long, value_enum, default_value_t = CapsPreset::Full)]
    caps: CapsPreset,

    /// Device features to remove from the preset, comma separated.
    #[arg(long, default_value = "")]
    without: String,

    /// Texture settings as a JSON string.
    #[arg(long, default_value = "{}")]
    settings: String,

    /// Pattern parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,
}

impl PipelineArgs {
    fn device(&self) -> Result<RecordingDevice, CliError> {
        let mut caps = match self.caps {
            CapsPreset::Full => DeviceCaps::full(),
            CapsPreset::Minimal => DeviceCaps::minimal(),
        };
        let without: DeviceFeatures = parse_flag_list(&self.without, "--without")?;
        caps = caps.without(without);
        Ok(RecordingDevice::new(caps))
    }

    fn registry(&self) -> Result<TextureRegistry, CliError> {
        let settings: Value = serde_json::from_str(&self.settings)
            .map_err(|e| CliError::Input(format!("invalid --settings JSON: {e}")))?;
        Ok(TextureRegistry::new(TextureSettings::from_json(&settings)))
    }

    fn acquire(&self, input: &str) -> Result<(String, SourceImage, TextureFlags), CliError> {
        let mut flags: TextureFlags = parse_flag_list(&self.flags, "--flags")?;
        if let Some(name) = input.strip_prefix("pattern:") {
            let params: Value = serde_json::from_str(&self.params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let pattern = PatternKind::from_name(name)?;
            flags |= pattern.texture_flags();
            let image = pattern.render(self.width, self.height, &params)?;
            return Ok((name.to_string(), image, flags));
        }

        let path = PathBuf::from(input);
        let image = texpipe_io::snapshot::load_png(&path)?;
        let name = path
            .file_stem()
            .map_or_else(|| input.to_string(), |stem| stem.to_string_lossy().into_owned());
        Ok((name, image, flags))
    }
}

/// Parses "nomipmap, clamp" style lists into a flags value.
fn parse_flag_list<F>(text: &str, option: &str) -> Result<F, CliError>
where
    F: Flags,
    F::Bits: bitflags::parser::ParseHex,
{
    let expr = text
        .split(',')
        .map(|name| name.trim().to_ascii_uppercase().replace('-', "_"))
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    bitflags::parser::from_str::<F>(&expr)
        .map_err(|e| CliError::Input(format!("invalid {option} list '{text}': {e}")))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Patterns => {
            let patterns = PatternKind::list_patterns();
            if cli.json {
                let info = serde_json::json!({ "patterns": patterns });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Patterns:");
                for name in patterns {
                    println!("  {name}");
                }
            }
        }
        Command::Upload { input, pipeline } => {
            let mut device = pipeline.device()?;
            let mut registry = pipeline.registry()?;
            let (name, image, flags) = pipeline.acquire(&input)?;

            let record = registry
                .load(&mut device, 1, &name, image, flags, false)?
                .clone();

            if cli.json {
                let uploads: Vec<_> = device.uploads_for(1).collect();
                let info = serde_json::json!({
                    "record": record,
                    "uploads": uploads,
                    "stats": registry.stats(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{name}: {} {:?} {}x{}x{} ({}x{} source), {} mips, {}",
                    record.target,
                    record.internal_format,
                    record.width,
                    record.height,
                    record.depth,
                    record.source_width,
                    record.source_height,
                    record.mip_count,
                    format_bytes(record.byte_size),
                );
            }
        }
        Command::Mips {
            input,
            out,
            pipeline,
        } => {
            let mut device = pipeline.device()?;
            let mut registry = pipeline.registry()?;
            let (name, image, flags) = pipeline.acquire(&input)?;

            registry.load(&mut device, 1, &name, image, flags, false)?;
            std::fs::create_dir_all(&out)
                .map_err(|e| CliError::Io(format!("{}: {e}", out.display())))?;
            let written = texpipe_io::snapshot::write_levels(&out, &name, device.uploads_for(1))?;

            if cli.json {
                let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
                let info = serde_json::json!({ "name": name, "written": paths });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for path in &written {
                    eprintln!("wrote {}", path.display());
                }
                if written.is_empty() {
                    log::warn!("{name}: no uncompressed RGBA levels to export");
                }
            }
        }
        Command::List { inputs, pipeline } => {
            let mut device = pipeline.device()?;
            let mut registry = pipeline.registry()?;

            for (index, input) in inputs.iter().enumerate() {
                let (name, image, flags) = pipeline.acquire(input)?;
                // Handle 0 stays free for the default texture.
                if let Err(e) = registry.load(&mut device, index + 1, &name, image, flags, false) {
                    log::error!("{e}");
                }
            }

            let report = registry.texture_list();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
