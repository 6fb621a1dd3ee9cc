//! Error types for deskprobe

use thiserror::Error;

/// Result type alias using the common Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by every deskprobe crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl From<tracing_subscriber::filter::ParseError> for Error {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Error::Logging(e.to_string())
    }
}
