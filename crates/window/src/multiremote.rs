//! Window tracking across several application instances
//!
//! Each instance owns an independent [`WindowManager`]; no state is shared
//! between them, so bulk updates run concurrently without any locking.

use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::manager::{WindowHandle, WindowManager};

/// Named registry of per-instance window managers
#[derive(Debug, Default)]
pub struct MultiRemoteWindowManager {
    instances: HashMap<String, WindowManager>,
}

impl MultiRemoteWindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manager, returning the one it replaced
    pub fn register_instance(
        &mut self,
        name: impl Into<String>,
        manager: WindowManager,
    ) -> Option<WindowManager> {
        let name = name.into();
        debug!("Registering window manager for instance {}", name);
        self.instances.insert(name, manager)
    }

    pub fn unregister_instance(&mut self, name: &str) -> Option<WindowManager> {
        let removed = self.instances.remove(name);
        if removed.is_some() {
            debug!("Unregistered window manager for instance {}", name);
        }
        removed
    }

    pub fn instance_manager(&self, name: &str) -> Option<&WindowManager> {
        self.instances.get(name)
    }

    pub fn instance_manager_mut(&mut self, name: &str) -> Option<&mut WindowManager> {
        self.instances.get_mut(name)
    }

    pub fn instance_names(&self) -> Vec<&str> {
        self.instances.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Update every instance concurrently; maps name to "handle changed"
    pub async fn update_all_active_handles(&mut self) -> HashMap<String, bool> {
        let updates = self.instances.iter_mut().map(|(name, manager)| async move {
            let changed = manager.update_active_handle().await;
            (name.clone(), changed)
        });

        join_all(updates).await.into_iter().collect()
    }

    /// Number of instances whose active handle changed
    pub async fn ensure_all_active_windows(&mut self) -> usize {
        let changed = self
            .update_all_active_handles()
            .await
            .into_values()
            .filter(|changed| *changed)
            .count();

        if changed > 0 {
            info!("Active window changed in {} of {} instance(s)", changed, self.len());
        }
        changed
    }

    pub fn active_handles(&self) -> HashMap<String, Option<WindowHandle>> {
        self.instances
            .iter()
            .map(|(name, manager)| (name.clone(), manager.active_handle().cloned()))
            .collect()
    }
}
