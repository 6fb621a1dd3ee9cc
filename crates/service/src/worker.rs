//! Worker-side service lifecycle
//!
//! Before a session starts the worker runs
//! initialize API -> install command overrides -> after initialization.
//! Before every test it runs the mock lifecycle hooks selected by the
//! `clearMocks`, `resetMocks` and `restoreMocks` flags. The flags are
//! independent; any combination may be enabled.

use async_trait::async_trait;
use deskprobe_common::{Logger, LoggerRegistry, LOG_SCOPE};

use crate::capabilities::CapabilitySet;
use crate::error::{ServiceError, ServiceResult};
use crate::options::ServiceOptions;

/// Framework specific worker behaviour over an automation session `S`
#[async_trait]
pub trait WorkerAdapter<S: Send + 'static>: Send + Sync {
    /// Connect the bridge and expose the framework API on the session
    async fn initialize_api(&self, session: &mut S, capabilities: &CapabilitySet) -> ServiceResult<()>;

    async fn install_command_overrides(&self, _session: &mut S) -> ServiceResult<()> {
        Ok(())
    }

    async fn after_initialization(&self, _session: &mut S) -> ServiceResult<()> {
        Ok(())
    }

    async fn clear_mocks(&self, _session: &mut S) -> ServiceResult<()> {
        Ok(())
    }

    async fn reset_mocks(&self, _session: &mut S) -> ServiceResult<()> {
        Ok(())
    }

    async fn restore_mocks(&self, _session: &mut S) -> ServiceResult<()> {
        Ok(())
    }
}

pub struct WorkerService<S, A> {
    adapter: A,
    options: ServiceOptions,
    session: Option<S>,
    logger: Logger,
}

impl<S: Send + 'static, A: WorkerAdapter<S>> WorkerService<S, A> {
    pub fn new(adapter: A, options: ServiceOptions, loggers: &LoggerRegistry) -> Self {
        Self {
            adapter,
            options,
            session: None,
            logger: loggers.logger(LOG_SCOPE, Some("service")),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    pub fn into_session(self) -> Option<S> {
        self.session
    }

    /// Take ownership of the session and initialize it
    pub async fn before(&mut self, session: S, capabilities: &CapabilitySet) -> ServiceResult<()> {
        let session = self.session.insert(session);

        self.adapter.initialize_api(session, capabilities).await?;
        self.adapter.install_command_overrides(session).await?;
        self.adapter.after_initialization(session).await?;

        self.logger.debug("Worker service initialized");
        Ok(())
    }

    /// Run the mock hooks enabled in the options: clear, reset, restore
    pub async fn before_test(&mut self) -> ServiceResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or(ServiceError::SessionNotInitialized)?;

        if self.options.clear_mocks {
            self.logger.debug("Clearing mocks");
            self.adapter.clear_mocks(session).await?;
        }
        if self.options.reset_mocks {
            self.logger.debug("Resetting mocks");
            self.adapter.reset_mocks(session).await?;
        }
        if self.options.restore_mocks {
            self.logger.debug("Restoring mocks");
            self.adapter.restore_mocks(session).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[derive(Default)]
    struct Session {
        calls: Vec<&'static str>,
    }

    struct Recording;

    #[async_trait]
    impl WorkerAdapter<Session> for Recording {
        async fn initialize_api(
            &self,
            session: &mut Session,
            _capabilities: &CapabilitySet,
        ) -> ServiceResult<()> {
            session.calls.push("initialize_api");
            Ok(())
        }

        async fn install_command_overrides(&self, session: &mut Session) -> ServiceResult<()> {
            session.calls.push("install_command_overrides");
            Ok(())
        }

        async fn after_initialization(&self, session: &mut Session) -> ServiceResult<()> {
            session.calls.push("after_initialization");
            Ok(())
        }

        async fn clear_mocks(&self, session: &mut Session) -> ServiceResult<()> {
            session.calls.push("clear");
            Ok(())
        }

        async fn reset_mocks(&self, session: &mut Session) -> ServiceResult<()> {
            session.calls.push("reset");
            Ok(())
        }

        async fn restore_mocks(&self, session: &mut Session) -> ServiceResult<()> {
            session.calls.push("restore");
            Ok(())
        }
    }

    fn capabilities() -> CapabilitySet {
        CapabilitySet::from_value(json!({})).unwrap()
    }

    #[tokio::test]
    async fn test_before_order() {
        let mut service = WorkerService::new(Recording, ServiceOptions::default(), &LoggerRegistry::new());
        service.before(Session::default(), &capabilities()).await.unwrap();

        assert_eq!(
            service.session().unwrap().calls,
            vec!["initialize_api", "install_command_overrides", "after_initialization"]
        );
    }

    #[test_case(false, false, false, &[] ; "no flags")]
    #[test_case(true, false, false, &["clear"] ; "clear only")]
    #[test_case(false, false, true, &["restore"] ; "restore only")]
    #[test_case(true, false, true, &["clear", "restore"] ; "clear and restore")]
    #[test_case(true, true, true, &["clear", "reset", "restore"] ; "all flags")]
    #[tokio::test]
    async fn test_before_test_flags(clear: bool, reset: bool, restore: bool, expected: &[&str]) {
        let options = ServiceOptions {
            clear_mocks: clear,
            reset_mocks: reset,
            restore_mocks: restore,
            ..Default::default()
        };
        let mut service = WorkerService::new(Recording, options, &LoggerRegistry::new());
        service.before(Session::default(), &capabilities()).await.unwrap();
        service.session_mut().unwrap().calls.clear();

        service.before_test().await.unwrap();
        assert_eq!(service.into_session().unwrap().calls, expected);
    }

    #[tokio::test]
    async fn test_before_test_requires_session() {
        let options = ServiceOptions {
            clear_mocks: true,
            ..Default::default()
        };
        let mut service: WorkerService<Session, _> =
            WorkerService::new(Recording, options, &LoggerRegistry::new());

        let err = service.before_test().await.unwrap_err();
        assert!(matches!(err, ServiceError::SessionNotInitialized));
    }
}
