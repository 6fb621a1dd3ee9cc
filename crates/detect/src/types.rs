//! Data model of a binary detection run
//!
//! Field names serialise in camelCase and error kinds in SCREAMING_SNAKE_CASE
//! so results can be handed to the JavaScript side of an adapter unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// Input of a single detection call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryDetectionOptions {
    /// Root of the application project
    pub project_root: PathBuf,

    /// Version of the application framework (Electron, Tauri, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_version: Option<String>,

    /// Framework specific settings (app name, build tool hints, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BinaryDetectionOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            framework_version: None,
            extra: Map::new(),
        }
    }

    pub fn with_framework_version(mut self, version: impl Into<String>) -> Self {
        self.framework_version = Some(version.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// String-valued extra field
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// Why candidate paths could not be (fully) derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathGenerationErrorKind {
    UnsupportedPlatform,
    NoBuildTool,
    ConfigInvalid,
    ConfigMissing,
    ConfigWarning,
}

impl PathGenerationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathGenerationErrorKind::UnsupportedPlatform => "UNSUPPORTED_PLATFORM",
            PathGenerationErrorKind::NoBuildTool => "NO_BUILD_TOOL",
            PathGenerationErrorKind::ConfigInvalid => "CONFIG_INVALID",
            PathGenerationErrorKind::ConfigMissing => "CONFIG_MISSING",
            PathGenerationErrorKind::ConfigWarning => "CONFIG_WARNING",
        }
    }
}

impl fmt::Display for PathGenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found while deriving candidate paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathGenerationError {
    #[serde(rename = "type")]
    pub kind: PathGenerationErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl PathGenerationError {
    pub fn new(kind: PathGenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            build_tool: None,
            details: None,
        }
    }

    pub fn with_build_tool(mut self, build_tool: impl Into<String>) -> Self {
        self.build_tool = Some(build_tool.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Phase 1 output: candidates in priority order plus diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathGenerationResult {
    pub success: bool,
    pub paths: Vec<PathBuf>,
    #[serde(default)]
    pub errors: Vec<PathGenerationError>,
}

impl PathGenerationResult {
    /// Successful generation of the given candidates
    pub fn found(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            success: true,
            paths: paths.into_iter().map(Into::into).collect(),
            errors: Vec::new(),
        }
    }

    /// Failed generation; no candidates
    pub fn failed(errors: impl IntoIterator<Item = PathGenerationError>) -> Self {
        Self {
            success: false,
            paths: Vec::new(),
            errors: errors.into_iter().collect(),
        }
    }

    /// Attach a non-fatal diagnostic (typically `CONFIG_WARNING`)
    pub fn with_error(mut self, error: PathGenerationError) -> Self {
        self.errors.push(error);
        self
    }
}

/// Why a probed candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathValidationErrorKind {
    FileNotFound,
    NotExecutable,
    PermissionDenied,
    IsDirectory,
}

impl PathValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathValidationErrorKind::FileNotFound => "FILE_NOT_FOUND",
            PathValidationErrorKind::NotExecutable => "NOT_EXECUTABLE",
            PathValidationErrorKind::PermissionDenied => "PERMISSION_DENIED",
            PathValidationErrorKind::IsDirectory => "IS_DIRECTORY",
        }
    }
}

impl fmt::Display for PathValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathValidationError {
    #[serde(rename = "type")]
    pub kind: PathValidationErrorKind,
    pub message: String,
}

impl PathValidationError {
    pub fn new(kind: PathValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// One probed candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathValidationAttempt {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PathValidationError>,
}

impl PathValidationAttempt {
    pub fn valid(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            error: None,
        }
    }

    pub fn invalid(path: &Path, error: PathValidationError) -> Self {
        Self {
            path: path.to_path_buf(),
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Phase 2 output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathValidationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_path: Option<PathBuf>,
    pub attempts: Vec<PathValidationAttempt>,
}

impl PathValidationResult {
    /// Validation that never ran because generation produced nothing usable
    pub fn skipped() -> Self {
        Self {
            success: false,
            valid_path: None,
            attempts: Vec::new(),
        }
    }
}

/// Complete, immutable outcome of one detection call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryDetectionResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    binary_path: Option<PathBuf>,
    path_generation: PathGenerationResult,
    path_validation: PathValidationResult,
}

impl BinaryDetectionResult {
    pub(crate) fn new(
        path_generation: PathGenerationResult,
        path_validation: PathValidationResult,
    ) -> Self {
        let success = path_generation.success && path_validation.success;
        let binary_path = if success {
            path_validation.valid_path.clone()
        } else {
            None
        };

        Self {
            success: success && binary_path.is_some(),
            binary_path,
            path_generation,
            path_validation,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Defined iff [`success`](Self::success) is true
    pub fn binary_path(&self) -> Option<&Path> {
        self.binary_path.as_deref()
    }

    pub fn path_generation(&self) -> &PathGenerationResult {
        &self.path_generation
    }

    pub fn path_validation(&self) -> &PathValidationResult {
        &self.path_validation
    }
}
