//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: texture error (unsupported target or format, overrun, bad handle)
//! - 11: I/O error (PNG read or write)
//! - 12: input error (bad flags, bad JSON settings or params)
//! - 13: serialization error

use std::fmt;

use texpipe_core::TextureError;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    /// A registry or upload error.
    Texture(TextureError),
    /// An I/O error (image decode, PNG export).
    Io(String),
    /// A user input error (bad flag list, bad JSON).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Texture(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Texture(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<TextureError> for CliError {
    fn from(e: TextureError) -> Self {
        match e {
            TextureError::Io(msg) => CliError::Io(msg),
            TextureError::UnknownPattern(name) => CliError::Input(format!("unknown pattern: {name}")),
            other => CliError::Texture(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
