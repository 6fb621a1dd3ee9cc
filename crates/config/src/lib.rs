//! deskprobe configuration reader
//!
//! Reads build-tool and service configuration from the first matching file in
//! an ordered list of candidates:
//! - JSON / JSON5 (comments and trailing commas tolerated), YAML, TOML
//! - executable config scripts through a pluggable [`ScriptLoader`]
//! - optional `extends` inheritance with a shallow, child-wins merge
//! - optional schema validation of the merged result
//!
//! ```no_run
//! use deskprobe_config::{ConfigReader, ConfigReaderOptions};
//! use std::path::Path;
//!
//! # async fn demo() -> deskprobe_config::ConfigResult<()> {
//! let reader: ConfigReader<serde_json::Value> = ConfigReader::new(
//!     ConfigReaderOptions::new(["tauri.conf.json", "tauri.conf.json5", "Tauri.toml"])
//!         .with_extends(true),
//! );
//! let result = reader.read(Path::new("src-tauri")).await?;
//! println!("loaded {}", result.config_file.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod format;
pub mod reader;
pub mod script;

pub use error::{ConfigError, ConfigResult};
pub use format::{parse_config_file, ConfigFormat};
pub use reader::{merge_shallow, ConfigReadResult, ConfigReader, ConfigReaderOptions, ConfigSchema};
pub use script::{NodeScriptLoader, ScriptLoader};
