//! Loading executable configuration scripts
//!
//! Script configs (`.js`, `.ts`, ...) are evaluated by the hosting
//! environment. The reader only needs "given a path, produce a value", which
//! is what [`ScriptLoader`] captures. [`NodeScriptLoader`] is the stock
//! implementation that shells out to a Node.js compatible runtime.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Produces a plain value from an executable config file
#[async_trait]
pub trait ScriptLoader: Send + Sync {
    async fn load(&self, path: &Path) -> ConfigResult<Value>;
}

#[async_trait]
impl<S: ScriptLoader + ?Sized> ScriptLoader for Arc<S> {
    async fn load(&self, path: &Path) -> ConfigResult<Value> {
        (**self).load(path).await
    }
}

/// Evaluates the script with an external JavaScript runtime.
///
/// The module's default export is used, or the module namespace when there is
/// none. A function export is invoked with no arguments and awaited.
#[derive(Debug, Clone)]
pub struct NodeScriptLoader {
    /// Runtime executable, `node` by default
    pub program: PathBuf,

    /// Extra arguments placed before the evaluation flags
    /// (e.g. `--import tsx` for TypeScript configs)
    pub args: Vec<String>,
}

impl Default for NodeScriptLoader {
    fn default() -> Self {
        Self {
            program: PathBuf::from("node"),
            args: Vec::new(),
        }
    }
}

const EVAL_SCRIPT: &str = r#"
const { pathToFileURL } = require('node:url');
(async () => {
  const mod = await import(pathToFileURL(process.argv[process.argv.length - 1]).href);
  let value = mod && mod.default !== undefined ? mod.default : mod;
  if (value && value.default !== undefined && Object.keys(value).length === 1) value = value.default;
  if (typeof value === 'function') value = await value();
  process.stdout.write(JSON.stringify(value === undefined ? null : value));
})().catch((err) => {
  process.stderr.write(String(err && err.stack ? err.stack : err));
  process.exit(1);
});
"#;

impl NodeScriptLoader {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl ScriptLoader for NodeScriptLoader {
    async fn load(&self, path: &Path) -> ConfigResult<Value> {
        debug!(
            "Evaluating config script {} with {}",
            path.display(),
            self.program.display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("-e")
            .arg(EVAL_SCRIPT)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ConfigError::Script {
                path: path.to_path_buf(),
                message: format!("failed to spawn {}: {}", self.program.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("script exited with non-zero status")
                .trim()
                .to_string();
            return Err(ConfigError::Script {
                path: path.to_path_buf(),
                message: detail,
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| ConfigError::Script {
            path: path.to_path_buf(),
            message: format!("script did not produce JSON: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_runtime_is_script_error() {
        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("app.config.js");
        tokio::fs::write(&script, "module.exports = { a: 1 }").await.unwrap();

        let loader = NodeScriptLoader::new(tmp.path().join("no-such-runtime"));
        let err = loader.load(&script).await.unwrap_err();
        match err {
            ConfigError::Script { message, .. } => assert!(message.contains("failed to spawn")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runtime_stdout_is_parsed() {
        use std::os::unix::fs::PermissionsExt;

        // Stand-in runtime that ignores its arguments and prints a fixed object
        let tmp = TempDir::new().unwrap();
        let runtime = tmp.path().join("fake-node");
        std::fs::write(&runtime, "#!/bin/sh\nprintf '{\"outDir\":\"out\"}'\n").unwrap();
        std::fs::set_permissions(&runtime, std::fs::Permissions::from_mode(0o755)).unwrap();

        let script = tmp.path().join("app.config.ts");
        std::fs::write(&script, "export default {}").unwrap();

        let value = NodeScriptLoader::new(&runtime).load(&script).await.unwrap();
        assert_eq!(value, serde_json::json!({ "outDir": "out" }));
    }

    fn node_available() -> bool {
        std::process::Command::new("node")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_node_export_shapes() {
        if !node_available() {
            eprintln!("node not on PATH, skipping");
            return;
        }

        let tmp = TempDir::new().unwrap();
        let cases = [
            ("plain.config.mjs", "export default { plain: 1 }", serde_json::json!({ "plain": 1 })),
            (
                "factory.config.cjs",
                "module.exports = () => ({ factory: 2 })",
                serde_json::json!({ "factory": 2 }),
            ),
            (
                "async.config.mjs",
                "export default async () => { await Promise.resolve(); return { asyncValue: 3 }; }",
                serde_json::json!({ "asyncValue": 3 }),
            ),
            (
                "commonjs.config.cjs",
                "module.exports = { nested: { port: 4444 } }",
                serde_json::json!({ "nested": { "port": 4444 } }),
            ),
        ];

        let loader = NodeScriptLoader::default();
        for (name, source, expected) in cases {
            let script = tmp.path().join(name);
            std::fs::write(&script, source).unwrap();
            assert_eq!(loader.load(&script).await.unwrap(), expected, "{name}");
        }
    }

    #[tokio::test]
    async fn test_node_script_failure_is_reported() {
        if !node_available() {
            eprintln!("node not on PATH, skipping");
            return;
        }

        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("broken.config.cjs");
        std::fs::write(&script, "throw new Error('bad config')").unwrap();

        let err = NodeScriptLoader::default().load(&script).await.unwrap_err();
        match err {
            ConfigError::Script { message, .. } => assert!(message.contains("bad config")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
