//! Service options shared by launcher and worker

use deskprobe_config::{ConfigReadResult, ConfigReader, ConfigReaderOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};

/// Default file names searched by [`read_service_options`]
pub const DEFAULT_OPTION_FILES: &[&str] = &[
    "deskprobe.config.json",
    "deskprobe.config.json5",
    "deskprobe.config.yaml",
    "deskprobe.config.yml",
    "deskprobe.config.toml",
];

/// Options of one service instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceOptions {
    /// Explicit path to the packaged application binary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_binary_path: Option<PathBuf>,

    /// Explicit entry point for running the app unpackaged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_entry_point: Option<PathBuf>,

    pub app_args: Vec<String>,

    /// Clear mock call history before each test
    pub clear_mocks: bool,

    /// Reset mock implementations before each test
    pub reset_mocks: bool,

    /// Restore mocked functions before each test
    pub restore_mocks: bool,

    /// Framework specific settings
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceOptions {
    pub fn validate(&self) -> ServiceResult<()> {
        if self
            .app_binary_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ServiceError::InvalidConfig(
                "appBinaryPath must not be empty".to_string(),
            ));
        }

        if self
            .app_entry_point
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ServiceError::InvalidConfig(
                "appEntryPoint must not be empty".to_string(),
            ));
        }

        if self.app_binary_path.is_some() && self.app_entry_point.is_some() {
            return Err(ServiceError::InvalidConfig(
                "appBinaryPath and appEntryPoint are mutually exclusive".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether any mock lifecycle hook runs before each test
    pub fn has_mock_hooks(&self) -> bool {
        self.clear_mocks || self.reset_mocks || self.restore_mocks
    }
}

/// Read and validate service options from the first matching file
pub async fn read_service_options(
    project_root: &Path,
    file_patterns: &[&str],
) -> ServiceResult<ConfigReadResult<ServiceOptions>> {
    let options = ConfigReaderOptions::new(file_patterns.iter().copied())
        .with_extends(true)
        .with_schema(|value: Value| -> Result<ServiceOptions, String> {
            let options: ServiceOptions =
                serde_json::from_value(value).map_err(|e| e.to_string())?;
            options.validate().map_err(|e| e.to_string())?;
            Ok(options)
        });

    let result = ConfigReader::new(options).read(project_root).await?;
    debug!("Service options loaded from {}", result.config_file.display());
    Ok(result)
}
