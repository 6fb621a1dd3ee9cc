//! Human readable diagnostics for detection results

use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::BinaryDetectionResult;

/// A failed detection, carrying the full diagnostic trail
#[derive(Error, Debug, Clone)]
#[error("{report}")]
pub struct DetectionFailure {
    pub report: String,
    pub result: Box<BinaryDetectionResult>,
}

impl BinaryDetectionResult {
    /// Render every generation error and every probed candidate.
    ///
    /// Meant for user-facing error messages: "tried A, B, C; B exists but
    /// lacks execute permission" is actionable, "not found" is not.
    pub fn diagnostic_report(&self) -> String {
        let mut out = String::new();

        if let Some(path) = self.binary_path() {
            let _ = writeln!(
                out,
                "Binary found at {} after {} attempt(s).",
                path.display(),
                self.path_validation().attempts.len()
            );
        } else {
            let _ = writeln!(out, "Binary detection failed.");
        }

        let generation = self.path_generation();
        if !generation.errors.is_empty() {
            let _ = writeln!(out, "Path generation:");
            for error in &generation.errors {
                let _ = write!(out, "  - [{}] {}", error.kind, error.message);
                if let Some(tool) = &error.build_tool {
                    let _ = write!(out, " (build tool: {})", tool);
                }
                if let Some(details) = &error.details {
                    let _ = write!(out, ": {}", details);
                }
                out.push('\n');
            }
        }

        let attempts = &self.path_validation().attempts;
        if attempts.is_empty() {
            if !self.success() {
                let _ = writeln!(out, "No candidate paths were checked.");
            }
        } else {
            let _ = writeln!(out, "Checked {} candidate path(s):", attempts.len());
            for (index, attempt) in attempts.iter().enumerate() {
                match &attempt.error {
                    Some(error) => {
                        let _ = writeln!(
                            out,
                            "  {}. {} [{}] {}",
                            index + 1,
                            attempt.path.display(),
                            error.kind,
                            error.message
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  {}. {} [OK]", index + 1, attempt.path.display());
                    }
                }
            }
        }

        out.trim_end().to_string()
    }

    /// The binary path, or the diagnostic trail as an error
    pub fn into_path(self) -> Result<PathBuf, DetectionFailure> {
        match self.binary_path() {
            Some(path) => Ok(path.to_path_buf()),
            None => Err(DetectionFailure {
                report: self.diagnostic_report(),
                result: Box::new(self),
            }),
        }
    }
}
