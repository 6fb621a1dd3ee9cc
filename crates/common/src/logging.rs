//! Logging setup and the named logger registry
//!
//! Framework crates log through `tracing` directly. Adapters that want the
//! `scope:area` naming used by the JavaScript side of the tooling obtain a
//! [`Logger`] from an explicitly constructed [`LoggerRegistry`]. The registry
//! is a cache only: clearing it never loses log output.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; `default_directive` (e.g. `"info"` or
/// `"deskprobe_detect=debug"`) applies when it is unset. Calling this more than
/// once is harmless: later calls keep the first subscriber.
pub fn init(format: LogFormat, default_directive: &str) -> Result<()> {
    let directive: Directive = default_directive.parse()?;
    let filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed, keeping existing one");
    }
    Ok(())
}

/// A named logger, e.g. `deskprobe:launcher`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    name: Arc<str>,
}

impl Logger {
    fn new(name: String) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug(&self, message: impl fmt::Display) {
        tracing::debug!(logger = %self.name, "{}", message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        tracing::info!(logger = %self.name, "{}", message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        tracing::warn!(logger = %self.name, "{}", message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        tracing::error!(logger = %self.name, "{}", message);
    }
}

/// Construct-once cache of [`Logger`]s keyed by `scope:area`
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Logger>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the logger for `scope` and optional `area`
    pub fn logger(&self, scope: &str, area: Option<&str>) -> Logger {
        let name = match area {
            Some(area) => format!("{}:{}", scope, area),
            None => scope.to_string(),
        };

        if let Some(logger) = self.loggers.read().get(&name) {
            return logger.clone();
        }

        self.loggers
            .write()
            .entry(name.clone())
            .or_insert_with(|| Logger::new(name))
            .clone()
    }

    /// Number of cached loggers
    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Drop every cached logger
    pub fn clear(&self) {
        self.loggers.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_names() {
        let registry = LoggerRegistry::new();
        assert_eq!(registry.logger("deskprobe", None).name(), "deskprobe");
        assert_eq!(
            registry.logger("deskprobe", Some("window")).name(),
            "deskprobe:window"
        );
    }

    #[test]
    fn test_registry_caches_and_clears() {
        let registry = LoggerRegistry::new();
        let first = registry.logger("deskprobe", Some("launcher"));
        let second = registry.logger("deskprobe", Some("launcher"));
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);

        registry.logger("deskprobe", Some("worker"));
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_init_is_idempotent() {
        init(LogFormat::Pretty, "info").unwrap();
        init(LogFormat::Json, "deskprobe_common=debug").unwrap();
    }
}
