//! Launcher lifecycle, run once per test run
//!
//! `on_prepare` runs validate -> prepare capabilities -> prepare hook, in that
//! fixed order, stopping at the first failure. `on_complete` runs once after
//! every worker has finished.

use async_trait::async_trait;
use deskprobe_common::{Logger, LoggerRegistry, LOG_SCOPE};

use crate::capabilities::CapabilitySet;
use crate::error::ServiceResult;
use crate::options::ServiceOptions;

/// Framework specific launcher behaviour
#[async_trait]
pub trait LauncherAdapter: Send + Sync {
    async fn validate_config(&self, options: &ServiceOptions) -> ServiceResult<()> {
        options.validate()
    }

    /// Weave detection and config results into the session capabilities
    async fn prepare_capabilities(
        &self,
        options: &ServiceOptions,
        capabilities: &mut CapabilitySet,
    ) -> ServiceResult<()>;

    async fn on_prepare_hook(
        &self,
        _options: &ServiceOptions,
        _capabilities: &CapabilitySet,
    ) -> ServiceResult<()> {
        Ok(())
    }

    async fn on_complete(
        &self,
        _exit_code: i32,
        _options: &ServiceOptions,
        _capabilities: &CapabilitySet,
    ) -> ServiceResult<()> {
        Ok(())
    }
}

pub struct Launcher<A> {
    adapter: A,
    logger: Logger,
}

impl<A: LauncherAdapter> Launcher<A> {
    pub fn new(adapter: A, loggers: &LoggerRegistry) -> Self {
        Self {
            adapter,
            logger: loggers.logger(LOG_SCOPE, Some("launcher")),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub async fn on_prepare(
        &self,
        options: &ServiceOptions,
        capabilities: &mut CapabilitySet,
    ) -> ServiceResult<()> {
        self.adapter.validate_config(options).await?;

        self.logger.debug(format_args!(
            "Preparing {} capability set(s)",
            capabilities.len()
        ));
        self.adapter
            .prepare_capabilities(options, capabilities)
            .await?;

        self.adapter.on_prepare_hook(options, capabilities).await?;
        self.logger.info("Launcher prepared");
        Ok(())
    }

    pub async fn on_complete(
        &self,
        exit_code: i32,
        options: &ServiceOptions,
        capabilities: &CapabilitySet,
    ) -> ServiceResult<()> {
        if exit_code == 0 {
            self.logger.debug("Test run finished");
        } else {
            self.logger
                .warn(format_args!("Test run finished with exit code {}", exit_code));
        }
        self.adapter
            .on_complete(exit_code, options, capabilities)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<&'static str>>,
        fail_prepare: bool,
    }

    #[async_trait]
    impl LauncherAdapter for Recording {
        async fn validate_config(&self, options: &ServiceOptions) -> ServiceResult<()> {
            self.calls.lock().push("validate");
            options.validate()
        }

        async fn prepare_capabilities(
            &self,
            _options: &ServiceOptions,
            capabilities: &mut CapabilitySet,
        ) -> ServiceResult<()> {
            self.calls.lock().push("prepare");
            if self.fail_prepare {
                return Err(anyhow::anyhow!("no build tool").into());
            }
            for caps in capabilities.each_mut() {
                caps.insert("prepared".to_string(), json!(true));
            }
            Ok(())
        }

        async fn on_prepare_hook(
            &self,
            _options: &ServiceOptions,
            _capabilities: &CapabilitySet,
        ) -> ServiceResult<()> {
            self.calls.lock().push("hook");
            Ok(())
        }
    }

    fn capabilities() -> CapabilitySet {
        CapabilitySet::from_value(json!({ "browserName": "tauri" })).unwrap()
    }

    #[tokio::test]
    async fn test_on_prepare_order() {
        let launcher = Launcher::new(Recording::default(), &LoggerRegistry::new());
        let mut caps = capabilities();

        launcher
            .on_prepare(&ServiceOptions::default(), &mut caps)
            .await
            .unwrap();

        assert_eq!(*launcher.adapter().calls.lock(), vec!["validate", "prepare", "hook"]);
        assert_eq!(caps.each()[0]["prepared"], json!(true));
    }

    #[tokio::test]
    async fn test_invalid_config_stops_pipeline() {
        let launcher = Launcher::new(Recording::default(), &LoggerRegistry::new());
        let options = ServiceOptions {
            app_binary_path: Some("/opt/app".into()),
            app_entry_point: Some("main.js".into()),
            ..Default::default()
        };

        let err = launcher.on_prepare(&options, &mut capabilities()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfig(_)));
        assert_eq!(*launcher.adapter().calls.lock(), vec!["validate"]);
    }

    #[tokio::test]
    async fn test_adapter_failure_skips_hook() {
        let adapter = Recording {
            fail_prepare: true,
            ..Default::default()
        };
        let launcher = Launcher::new(adapter, &LoggerRegistry::new());

        let err = launcher
            .on_prepare(&ServiceOptions::default(), &mut capabilities())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Adapter(_)));
        assert_eq!(*launcher.adapter().calls.lock(), vec!["validate", "prepare"]);
    }

    #[tokio::test]
    async fn test_on_complete_default_is_noop() {
        let launcher = Launcher::new(Recording::default(), &LoggerRegistry::new());
        launcher
            .on_complete(1, &ServiceOptions::default(), &capabilities())
            .await
            .unwrap();
        assert!(launcher.adapter().calls.lock().is_empty());
    }
}
