//! Error types for configuration reading

use std::path::PathBuf;
use thiserror::Error;

use crate::format::ConfigFormat;

/// Result type alias for configuration reading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration errors. Every variant is fatal for a read.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no config file found, looked for: {}", searched.join(", "))]
    NotFound { searched: Vec<String> },

    #[error("unsupported config file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse {format} config {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    #[error("extended config {} not found (referenced from {})", path.display(), from.display())]
    ExtendsNotFound { path: PathBuf, from: PathBuf },

    #[error("circular extends chain: {}", format_chain(chain))]
    CircularExtends { chain: Vec<PathBuf> },

    #[error("config validation failed for {}: {message}", path.display())]
    Validation { path: PathBuf, message: String },

    #[error("no script loader configured, cannot load {}", path.display())]
    ScriptLoaderMissing { path: PathBuf },

    #[error("config script {} failed: {message}", path.display())]
    Script { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
