//! deskprobe Common Library
//!
//! Shared error type, platform utilities and logging infrastructure used by
//! the detection, configuration, window-tracking and service crates.

pub mod error;
pub mod logging;
pub mod platform;

// Re-export commonly used types
pub use error::{Error, Result};
pub use logging::{LogFormat, Logger, LoggerRegistry};
pub use platform::{Arch, Platform};

/// deskprobe version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scope prefix used for every logger created by the framework crates
pub const LOG_SCOPE: &str = "deskprobe";
