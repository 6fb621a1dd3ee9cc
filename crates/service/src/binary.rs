//! Application binary resolution for launchers

use deskprobe_detect::{BinaryDetectionOptions, BinaryDetector, BinaryPathStrategy};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::ServiceResult;
use crate::options::ServiceOptions;

/// Run detection, turning failure into [`ServiceError::BinaryNotFound`]
///
/// [`ServiceError::BinaryNotFound`]: crate::error::ServiceError::BinaryNotFound
pub async fn resolve_app_binary<S: BinaryPathStrategy>(
    detector: &BinaryDetector<S>,
    options: &BinaryDetectionOptions,
) -> ServiceResult<PathBuf> {
    let path = detector.detect_binary_path(options).await.into_path()?;
    info!("Using application binary {}", path.display());
    Ok(path)
}

/// Explicit `appBinaryPath` wins; otherwise detect under the project root
pub async fn binary_for_service<S: BinaryPathStrategy>(
    service_options: &ServiceOptions,
    detector: &BinaryDetector<S>,
    detection_options: &BinaryDetectionOptions,
) -> ServiceResult<PathBuf> {
    if let Some(path) = &service_options.app_binary_path {
        debug!("Using configured appBinaryPath {}", path.display());
        return Ok(path.clone());
    }
    resolve_app_binary(detector, detection_options).await
}
