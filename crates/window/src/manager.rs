//! Active window selection for a single session

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Opaque window identifier; only equality is meaningful
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(String);

impl WindowHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowHandle {
    fn from(handle: &str) -> Self {
        Self(handle.to_string())
    }
}

impl From<String> for WindowHandle {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

/// Point-in-time snapshot of one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl WindowInfo {
    pub fn new(handle: impl Into<WindowHandle>, kind: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            kind: kind.into(),
            url: None,
            title: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Framework specific window enumeration (CDP targets, WebView instances, ...)
///
/// The order of the returned windows is whatever the underlying protocol
/// reports. When the remembered window is gone the manager falls back to the
/// first entry, so enumerators that need a deterministic choice must sort
/// their output themselves.
#[async_trait]
pub trait WindowEnumerator: Send + Sync {
    /// Currently open windows. Enumeration failures surface as an empty list.
    async fn available_windows(&self) -> Vec<WindowInfo>;
}

/// Tracks the active window of one session
pub struct WindowManager {
    enumerator: Arc<dyn WindowEnumerator>,
    active: Option<WindowHandle>,
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowManager")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    pub fn new(enumerator: Arc<dyn WindowEnumerator>) -> Self {
        Self {
            enumerator,
            active: None,
        }
    }

    pub fn active_handle(&self) -> Option<&WindowHandle> {
        self.active.as_ref()
    }

    /// Re-evaluate the active window, returning whether it changed.
    ///
    /// The remembered handle is kept while it is still open, even if new
    /// windows appeared. Otherwise the first available window is chosen. An
    /// empty window list clears the handle.
    pub async fn update_active_handle(&mut self) -> bool {
        let windows = self.enumerator.available_windows().await;

        let next = match &self.active {
            Some(current) if windows.iter().any(|w| &w.handle == current) => {
                return false;
            }
            _ => windows.first().map(|w| w.handle.clone()),
        };

        if next == self.active {
            return false;
        }

        match &next {
            Some(handle) => info!("Active window changed to {}", handle),
            None => debug!("No window available, clearing active handle"),
        }
        self.active = next;
        true
    }

    /// Update, then return the active handle
    pub async fn ensure_active_window(&mut self) -> Option<WindowHandle> {
        self.update_active_handle().await;
        self.active.clone()
    }

    pub async fn is_handle_valid(&self, handle: &WindowHandle) -> bool {
        self.enumerator
            .available_windows()
            .await
            .iter()
            .any(|w| &w.handle == handle)
    }

    pub async fn window_info(&self, handle: &WindowHandle) -> Option<WindowInfo> {
        self.enumerator
            .available_windows()
            .await
            .into_iter()
            .find(|w| &w.handle == handle)
    }

    pub async fn available_handles(&self) -> Vec<WindowHandle> {
        self.enumerator
            .available_windows()
            .await
            .into_iter()
            .map(|w| w.handle)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Enumerator whose window list is swapped by the test
    #[derive(Default)]
    pub(crate) struct StaticWindows {
        windows: Mutex<Vec<WindowInfo>>,
    }

    impl StaticWindows {
        pub(crate) fn with(handles: &[&str]) -> Arc<Self> {
            let enumerator = Arc::new(Self::default());
            enumerator.set(handles);
            enumerator
        }

        pub(crate) fn set(&self, handles: &[&str]) {
            *self.windows.lock() = handles
                .iter()
                .map(|h| WindowInfo::new(*h, "page"))
                .collect();
        }
    }

    #[async_trait]
    impl WindowEnumerator for StaticWindows {
        async fn available_windows(&self) -> Vec<WindowInfo> {
            self.windows.lock().clone()
        }
    }

    #[tokio::test]
    async fn test_prefers_current_window() {
        let windows = StaticWindows::with(&["w1"]);
        let mut manager = WindowManager::new(windows.clone());

        assert!(manager.update_active_handle().await);
        assert_eq!(manager.active_handle(), Some(&WindowHandle::from("w1")));

        windows.set(&["w1", "w2"]);
        assert!(!manager.update_active_handle().await);
        assert_eq!(manager.active_handle(), Some(&WindowHandle::from("w1")));

        windows.set(&["w2"]);
        assert!(manager.update_active_handle().await);
        assert_eq!(manager.active_handle(), Some(&WindowHandle::from("w2")));
    }

    #[tokio::test]
    async fn test_new_window_does_not_steal_focus() {
        let windows = StaticWindows::with(&["w1"]);
        let mut manager = WindowManager::new(windows.clone());
        manager.update_active_handle().await;

        windows.set(&["w2", "w1"]);
        assert!(!manager.update_active_handle().await);
        assert_eq!(manager.active_handle().unwrap().as_str(), "w1");
    }

    #[tokio::test]
    async fn test_empty_window_list() {
        let windows = StaticWindows::with(&[]);
        let mut manager = WindowManager::new(windows.clone());

        assert!(!manager.update_active_handle().await);
        assert!(manager.active_handle().is_none());

        windows.set(&["w1"]);
        assert_eq!(manager.ensure_active_window().await, Some(WindowHandle::from("w1")));

        windows.set(&[]);
        assert!(manager.update_active_handle().await);
        assert!(manager.active_handle().is_none());
    }

    #[tokio::test]
    async fn test_handle_queries() {
        let windows = Arc::new(StaticWindows::default());
        *windows.windows.lock() = vec![
            WindowInfo::new("main", "page")
                .with_url("tauri://localhost")
                .with_title("Main"),
            WindowInfo::new("devtools", "other"),
        ];
        let manager = WindowManager::new(windows);

        assert!(manager.is_handle_valid(&"main".into()).await);
        assert!(!manager.is_handle_valid(&"gone".into()).await);

        let info = manager.window_info(&"main".into()).await.unwrap();
        assert_eq!(info.title.as_deref(), Some("Main"));
        assert!(manager.window_info(&"gone".into()).await.is_none());

        assert_eq!(
            manager.available_handles().await,
            vec![WindowHandle::from("main"), WindowHandle::from("devtools")]
        );
    }

    #[test]
    fn test_window_info_serde() {
        let info = WindowInfo::new("w1", "page").with_url("app://index.html");
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "handle": "w1", "type": "page", "url": "app://index.html" })
        );
    }
}
