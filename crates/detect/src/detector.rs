//! Two-phase binary detector
//!
//! Phase 1 (candidate generation) is supplied per framework through
//! [`BinaryPathStrategy`]. Phase 2 (validation) is generic: candidates are
//! probed sequentially, in the order phase 1 produced them, and probing stops
//! at the first candidate that exists, is not a directory, is executable by
//! the current user and passes the strategy's acceptance hook.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::types::{
    BinaryDetectionOptions, BinaryDetectionResult, PathGenerationResult, PathValidationAttempt,
    PathValidationError, PathValidationErrorKind, PathValidationResult,
};

/// Framework specific half of binary detection
#[async_trait]
pub trait BinaryPathStrategy: Send + Sync {
    /// Produce candidate paths, most likely first.
    ///
    /// May read build-tool configuration but must not probe candidates for
    /// existence; that is the detector's job.
    async fn generate_binary_paths(&self, options: &BinaryDetectionOptions) -> PathGenerationResult;

    /// Extra acceptance check run after the generic checks passed
    async fn accept_binary(&self, _path: &Path) -> Result<(), PathValidationError> {
        Ok(())
    }
}

#[async_trait]
impl<S: BinaryPathStrategy + ?Sized> BinaryPathStrategy for Arc<S> {
    async fn generate_binary_paths(&self, options: &BinaryDetectionOptions) -> PathGenerationResult {
        (**self).generate_binary_paths(options).await
    }

    async fn accept_binary(&self, path: &Path) -> Result<(), PathValidationError> {
        (**self).accept_binary(path).await
    }
}

#[async_trait]
impl<S: BinaryPathStrategy + ?Sized> BinaryPathStrategy for Box<S> {
    async fn generate_binary_paths(&self, options: &BinaryDetectionOptions) -> PathGenerationResult {
        (**self).generate_binary_paths(options).await
    }

    async fn accept_binary(&self, path: &Path) -> Result<(), PathValidationError> {
        (**self).accept_binary(path).await
    }
}

/// Binary detector bound to one framework strategy
#[derive(Debug, Clone)]
pub struct BinaryDetector<S> {
    strategy: S,
}

impl<S: BinaryPathStrategy> BinaryDetector<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Run both phases. "Not found" is a regular result, never an error.
    pub async fn detect_binary_path(&self, options: &BinaryDetectionOptions) -> BinaryDetectionResult {
        debug!(
            "Detecting binary under {}",
            options.project_root.display()
        );

        let generation = self.strategy.generate_binary_paths(options).await;

        for error in &generation.errors {
            debug!("Path generation {}: {}", error.kind, error.message);
        }

        if !generation.success || generation.paths.is_empty() {
            // Upstream failure: zero attempts, no misleading FILE_NOT_FOUND entries
            warn!(
                "No candidate binary paths generated ({} error(s))",
                generation.errors.len()
            );
            return BinaryDetectionResult::new(generation, PathValidationResult::skipped());
        }

        let validation = self.validate_binary_paths(&generation.paths).await;
        BinaryDetectionResult::new(generation, validation)
    }

    /// Probe candidates in order, stopping at the first valid one
    pub async fn validate_binary_paths(&self, paths: &[PathBuf]) -> PathValidationResult {
        let mut attempts = Vec::new();

        for path in paths {
            match self.check_candidate(path).await {
                Ok(()) => {
                    info!("Found binary at {}", path.display());
                    attempts.push(PathValidationAttempt::valid(path));
                    return PathValidationResult {
                        success: true,
                        valid_path: Some(path.clone()),
                        attempts,
                    };
                }
                Err(error) => {
                    debug!("Rejected {}: {} ({})", path.display(), error.kind, error.message);
                    attempts.push(PathValidationAttempt::invalid(path, error));
                }
            }
        }

        warn!("None of {} candidate binary path(s) is usable", attempts.len());
        PathValidationResult {
            success: false,
            valid_path: None,
            attempts,
        }
    }

    async fn check_candidate(&self, path: &Path) -> Result<(), PathValidationError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| io_validation_error(path, &e))?;

        if metadata.is_dir() {
            return Err(PathValidationError::new(
                PathValidationErrorKind::IsDirectory,
                format!("{} is a directory", path.display()),
            ));
        }

        check_executable(path)?;
        self.strategy.accept_binary(path).await
    }
}

/// Map a filesystem error onto a validation error kind.
///
/// Unknown conditions count as `FILE_NOT_FOUND`.
pub fn classify_io_error(error: &io::Error) -> PathValidationErrorKind {
    match error.kind() {
        io::ErrorKind::NotFound => PathValidationErrorKind::FileNotFound,
        io::ErrorKind::PermissionDenied => PathValidationErrorKind::PermissionDenied,
        _ => classify_os_error(error.raw_os_error()),
    }
}

#[cfg(unix)]
fn classify_os_error(code: Option<i32>) -> PathValidationErrorKind {
    use nix::errno::Errno;

    match code {
        Some(code) if code == Errno::EISDIR as i32 => PathValidationErrorKind::IsDirectory,
        Some(code) if code == Errno::EACCES as i32 || code == Errno::EPERM as i32 => {
            PathValidationErrorKind::PermissionDenied
        }
        Some(code) if code == Errno::ENOEXEC as i32 => PathValidationErrorKind::NotExecutable,
        _ => PathValidationErrorKind::FileNotFound,
    }
}

#[cfg(not(unix))]
fn classify_os_error(_code: Option<i32>) -> PathValidationErrorKind {
    PathValidationErrorKind::FileNotFound
}

fn io_validation_error(path: &Path, error: &io::Error) -> PathValidationError {
    let kind = classify_io_error(error);
    PathValidationError::new(kind, format!("{}: {}", path.display(), error))
}

/// Execute permission for the current user, as `access(2)` reports it
#[cfg(unix)]
fn check_executable(path: &Path) -> Result<(), PathValidationError> {
    use nix::errno::Errno;
    use nix::unistd::{access, AccessFlags};

    access(path, AccessFlags::X_OK).map_err(|errno| {
        let kind = match errno {
            Errno::ENOENT | Errno::ENOTDIR => PathValidationErrorKind::FileNotFound,
            _ => PathValidationErrorKind::NotExecutable,
        };
        PathValidationError::new(
            kind,
            format!("{} is not executable: {}", path.display(), errno.desc()),
        )
    })
}

/// Windows has no execute bit; existence is all `access` can tell us there
#[cfg(not(unix))]
fn check_executable(_path: &Path) -> Result<(), PathValidationError> {
    Ok(())
}
