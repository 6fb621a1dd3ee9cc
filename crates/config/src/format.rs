//! Config file formats and their parsers
//!
//! Every format is materialised as a plain `serde_json::Value` so inheritance
//! merging and schema validation never care where a value came from.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::script::ScriptLoader;

/// Format of a config file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Json5,
    Yaml,
    Toml,
    /// Executable configuration (`.js`, `.cjs`, `.mjs`, `.ts`, `.cts`, `.mts`)
    Script,
}

impl ConfigFormat {
    /// Detect the format from a file extension. Unknown extensions yield `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ConfigFormat::Json),
            "json5" => Some(ConfigFormat::Json5),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "toml" => Some(ConfigFormat::Toml),
            "js" | "cjs" | "mjs" | "ts" | "cts" | "mts" => Some(ConfigFormat::Script),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Json5 => "JSON5",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Script => "script",
        }
    }

    /// Parse textual content. Script configs have no textual form.
    pub fn parse_str(&self, content: &str) -> Result<Value, String> {
        match self {
            ConfigFormat::Json => serde_json::from_str(content).or_else(|strict| {
                // Comments and trailing commas are common in hand-edited .json
                json5::from_str(content).map_err(|_| strict.to_string())
            }),
            ConfigFormat::Json5 => json5::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Script => Err("script configs must be loaded by a script loader".to_string()),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a single config file into a plain value, dispatching on extension
pub async fn parse_config_file(
    path: &Path,
    script_loader: Option<&dyn ScriptLoader>,
) -> ConfigResult<Value> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    debug!("Parsing {} config {}", format, path.display());

    if format == ConfigFormat::Script {
        let loader = script_loader.ok_or_else(|| ConfigError::ScriptLoaderMissing {
            path: path.to_path_buf(),
        })?;
        return loader.load(path).await;
    }

    let content = tokio::fs::read_to_string(path).await?;
    format.parse_str(&content).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        format,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("app.json", Some(ConfigFormat::Json))]
    #[test_case("app.json5", Some(ConfigFormat::Json5))]
    #[test_case("app.yml", Some(ConfigFormat::Yaml))]
    #[test_case("app.YAML", Some(ConfigFormat::Yaml))]
    #[test_case("app.toml", Some(ConfigFormat::Toml))]
    #[test_case("app.config.mts", Some(ConfigFormat::Script))]
    #[test_case("app.cjs", Some(ConfigFormat::Script))]
    #[test_case("app.ini", None)]
    #[test_case(".apprc", None)]
    fn test_format_from_path(name: &str, expected: Option<ConfigFormat>) {
        assert_eq!(ConfigFormat::from_path(&PathBuf::from(name)), expected);
    }

    #[test]
    fn test_json_tolerates_comments_and_trailing_commas() {
        let content = r#"{
            // build output
            "outDir": "dist",
            "enabled": true,
        }"#;
        let value = ConfigFormat::Json.parse_str(content).unwrap();
        assert_eq!(value, json!({ "outDir": "dist", "enabled": true }));
    }

    #[test]
    fn test_json5_syntax() {
        let content = r#"{
            // unquoted keys, single quotes, hex and trailing commas
            productName: 'Demo App',
            port: 0x2533,
            targets: ['deb', 'AppImage',],
        }"#;
        let value = ConfigFormat::Json5.parse_str(content).unwrap();
        assert_eq!(
            value,
            json!({ "productName": "Demo App", "port": 9523, "targets": ["deb", "AppImage"] })
        );
        assert!(ConfigFormat::Json5.parse_str("{ a: }").is_err());
    }

    #[test]
    fn test_invalid_json_reports_strict_error() {
        let err = ConfigFormat::Json.parse_str("{ nope").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn test_yaml_and_toml() {
        let yaml = ConfigFormat::Yaml.parse_str("name: app\nargs:\n  - --foo\n").unwrap();
        assert_eq!(yaml, json!({ "name": "app", "args": ["--foo"] }));

        let toml = ConfigFormat::Toml
            .parse_str("name = \"app\"\n[build]\nout = \"dist\"\n")
            .unwrap();
        assert_eq!(toml, json!({ "name": "app", "build": { "out": "dist" } }));
    }

    #[tokio::test]
    async fn test_parse_file_errors() {
        let tmp = TempDir::new().unwrap();

        let bad = tmp.path().join("bad.yaml");
        tokio::fs::write(&bad, "key: [unclosed").await.unwrap();
        assert!(matches!(
            parse_config_file(&bad, None).await,
            Err(ConfigError::Parse { format: ConfigFormat::Yaml, .. })
        ));

        let script = tmp.path().join("forge.config.js");
        tokio::fs::write(&script, "module.exports = {}").await.unwrap();
        assert!(matches!(
            parse_config_file(&script, None).await,
            Err(ConfigError::ScriptLoaderMissing { .. })
        ));

        let unknown = tmp.path().join("app.ini");
        assert!(matches!(
            parse_config_file(&unknown, None).await,
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }
}
