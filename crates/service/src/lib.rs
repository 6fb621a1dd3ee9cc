//! deskprobe service lifecycle
//!
//! Base types framework adapters build on:
//! - [`Launcher`] / [`LauncherAdapter`]: once-per-run capability preparation
//! - [`WorkerService`] / [`WorkerAdapter`]: per-session initialization and
//!   per-test mock lifecycle hooks
//! - [`ServiceOptions`] and [`CapabilitySet`] shared by both
//! - [`resolve_app_binary`] to turn a failed detection into a readable error

pub mod binary;
pub mod capabilities;
pub mod error;
pub mod launcher;
pub mod options;
pub mod worker;

pub use binary::{binary_for_service, resolve_app_binary};
pub use capabilities::{Capabilities, CapabilitySet};
pub use error::{ServiceError, ServiceResult};
pub use launcher::{Launcher, LauncherAdapter};
pub use options::{read_service_options, ServiceOptions, DEFAULT_OPTION_FILES};
pub use worker::{WorkerAdapter, WorkerService};
