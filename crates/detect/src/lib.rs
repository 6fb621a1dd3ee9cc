//! deskprobe binary detection
//!
//! Locates the built application binary in two phases:
//! 1. a framework [`BinaryPathStrategy`] generates candidate paths,
//! 2. the [`BinaryDetector`] validates them in order until one is usable.
//!
//! Every generation problem and every probed candidate is kept in the
//! [`BinaryDetectionResult`], which renders as a diagnostic report.

pub mod detector;
pub mod report;
pub mod types;

pub use detector::{classify_io_error, BinaryDetector, BinaryPathStrategy};
pub use report::DetectionFailure;
pub use types::{
    BinaryDetectionOptions, BinaryDetectionResult, PathGenerationError, PathGenerationErrorKind,
    PathGenerationResult, PathValidationAttempt, PathValidationError, PathValidationErrorKind,
    PathValidationResult,
};
