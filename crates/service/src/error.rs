//! Error types for the service lifecycle

use deskprobe_config::ConfigError;
use deskprobe_detect::DetectionFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid service configuration: {0}")]
    InvalidConfig(String),

    #[error("Application binary not found\n{0}")]
    BinaryNotFound(#[from] DetectionFailure),

    #[error("Worker session used before initialization")]
    SessionNotInitialized,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Adapter error: {0}")]
    Adapter(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
