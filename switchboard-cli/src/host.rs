//! Permission host backed by the console configuration.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use switchboard_core::{Host, Invoker};

use crate::config::ConsoleConfig;

/// Grants whatever keys the config file lists, to every invoker alike.
pub struct ConsoleHost {
    granted: RwLock<HashSet<String>>,
    message: Option<String>,
    enabled: AtomicBool,
}

impl ConsoleHost {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        ConsoleHost {
            granted: RwLock::new(config.permissions.iter().cloned().collect()),
            message: config.permission_message.clone(),
            enabled: AtomicBool::new(true),
        }
    }

    /// Swap the granted key set, e.g. after a config reload.
    pub fn replace_grants(&self, keys: impl IntoIterator<Item = String>) {
        if let Ok(mut granted) = self.granted.write() {
            *granted = keys.into_iter().collect();
        }
    }

    /// Tear the host down; subsequent dispatches fail silently.
    pub fn shut_down(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }
}

impl Host for ConsoleHost {
    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn has_permission(&self, _invoker: &Invoker, key: &str) -> bool {
        self.granted.read().is_ok_and(|granted| granted.contains(key))
    }

    fn permission_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
