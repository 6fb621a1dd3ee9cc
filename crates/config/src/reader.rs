//! Configuration reader
//!
//! Locates the first existing file from an ordered list of candidate names,
//! parses it by extension, resolves its `extends` chain and validates the
//! merged value.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::format::parse_config_file;
use crate::script::ScriptLoader;

/// Key holding the parent config reference
pub const EXTENDS_KEY: &str = "extends";

/// Validates a fully merged config value and turns it into `T`
pub trait ConfigSchema<T>: Send + Sync {
    fn validate(&self, value: Value) -> Result<T, String>;
}

impl<T, F> ConfigSchema<T> for F
where
    F: Fn(Value) -> Result<T, String> + Send + Sync,
{
    fn validate(&self, value: Value) -> Result<T, String> {
        self(value)
    }
}

/// Construction-time settings of a [`ConfigReader`]
pub struct ConfigReaderOptions<T> {
    /// Candidate file names relative to the project root, most preferred first
    pub file_patterns: Vec<String>,

    /// Validation applied to the merged value. Without one the value is
    /// deserialised into `T` with serde.
    pub schema: Option<Arc<dyn ConfigSchema<T>>>,

    /// Resolve `extends` inheritance
    pub extends: bool,

    /// Evaluator for executable config files
    pub script_loader: Option<Arc<dyn ScriptLoader>>,
}

impl<T> ConfigReaderOptions<T> {
    pub fn new(file_patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            file_patterns: file_patterns.into_iter().map(Into::into).collect(),
            schema: None,
            extends: false,
            script_loader: None,
        }
    }

    pub fn with_schema(mut self, schema: impl ConfigSchema<T> + 'static) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    pub fn with_extends(mut self, extends: bool) -> Self {
        self.extends = extends;
        self
    }

    pub fn with_script_loader(mut self, loader: impl ScriptLoader + 'static) -> Self {
        self.script_loader = Some(Arc::new(loader));
        self
    }
}

impl<T> fmt::Debug for ConfigReaderOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigReaderOptions")
            .field("file_patterns", &self.file_patterns)
            .field("schema", &self.schema.is_some())
            .field("extends", &self.extends)
            .field("script_loader", &self.script_loader.is_some())
            .finish()
    }
}

/// Outcome of a successful read
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigReadResult<T> {
    pub config: T,

    /// Matched file, relative to the project root
    pub config_file: PathBuf,
}

/// Reads one configuration file per project
#[derive(Debug)]
pub struct ConfigReader<T> {
    options: ConfigReaderOptions<T>,
}

impl<T: DeserializeOwned> ConfigReader<T> {
    pub fn new(options: ConfigReaderOptions<T>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConfigReaderOptions<T> {
        &self.options
    }

    /// Locate, parse, resolve and validate the project's config
    pub async fn read(&self, project_root: &Path) -> ConfigResult<ConfigReadResult<T>> {
        let config_file = self.find_config_file(project_root).await?;
        let full_path = project_root.join(&config_file);

        let value = if self.options.extends {
            let mut chain = Vec::new();
            self.resolve_extends(project_root, &full_path, &mut chain)
                .await?
        } else {
            self.parse(&full_path).await?
        };

        let config = self.validate(&full_path, value)?;

        info!("Loaded config {}", full_path.display());
        Ok(ConfigReadResult {
            config,
            config_file,
        })
    }

    /// Return the first candidate file that can be read, relative to the root.
    /// Directories matching a pattern are skipped.
    pub async fn find_config_file(&self, project_root: &Path) -> ConfigResult<PathBuf> {
        for pattern in &self.options.file_patterns {
            let candidate = project_root.join(pattern);
            let opened = match tokio::fs::File::open(&candidate).await {
                Ok(file) => file.metadata().await,
                Err(e) => Err(e),
            };
            match opened {
                Ok(metadata) if metadata.is_dir() => {
                    debug!("Config candidate {} is a directory, skipping", candidate.display());
                }
                Ok(_) => {
                    debug!("Found config file {}", candidate.display());
                    return Ok(PathBuf::from(pattern));
                }
                Err(e) => {
                    debug!("Config candidate {} not readable: {}", candidate.display(), e);
                }
            }
        }

        Err(ConfigError::NotFound {
            searched: self.options.file_patterns.clone(),
        })
    }

    async fn parse(&self, path: &Path) -> ConfigResult<Value> {
        parse_config_file(path, self.options.script_loader.as_deref()).await
    }

    /// Parse `path` and merge it over its ancestors, oldest ancestor first.
    ///
    /// `chain` holds the files currently being resolved; a file reappearing in
    /// it is a cycle.
    fn resolve_extends<'a>(
        &'a self,
        project_root: &'a Path,
        path: &'a Path,
        chain: &'a mut Vec<PathBuf>,
    ) -> Pin<Box<dyn Future<Output = ConfigResult<Value>> + Send + 'a>> {
        Box::pin(async move {
            let key = normalize(path);
            if chain.contains(&key) {
                let mut cycle = chain.clone();
                cycle.push(key);
                return Err(ConfigError::CircularExtends { chain: cycle });
            }
            chain.push(key);

            let value = self.parse(path).await?;

            let parent_ref = match &value {
                Value::Object(map) => map.get(EXTENDS_KEY).and_then(Value::as_str).map(str::to_string),
                _ => None,
            };

            let merged = match parent_ref {
                Some(parent_ref) => {
                    // Parents resolve against the project root, not the child's directory
                    let parent_path = project_root.join(&parent_ref);
                    if !tokio::fs::try_exists(&parent_path).await? {
                        return Err(ConfigError::ExtendsNotFound {
                            path: parent_path,
                            from: path.to_path_buf(),
                        });
                    }

                    debug!("{} extends {}", path.display(), parent_path.display());
                    let parent = self.resolve_extends(project_root, &parent_path, chain).await?;
                    merge_shallow(parent, value)
                }
                None => value,
            };

            chain.pop();
            Ok(merged)
        })
    }

    fn validate(&self, path: &Path, value: Value) -> ConfigResult<T> {
        let validated = match &self.options.schema {
            Some(schema) => schema.validate(value),
            None => serde_json::from_value(value).map_err(|e| e.to_string()),
        };

        validated.map_err(|message| ConfigError::Validation {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Child top-level keys override parent keys; nothing merges recursively
pub fn merge_shallow(parent: Value, child: Value) -> Value {
    match (parent, child) {
        (Value::Object(parent), Value::Object(child)) => {
            let mut merged: Map<String, Value> = parent;
            for (key, value) in child {
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (_, child) => child,
    }
}

/// Lexically normalise a path so `./a/../b.json` and `b.json` compare equal
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
