//! Key/value storage for the reconnect intent flag.
//!
//! Both stores keep string values under string keys, the way browser local storage does: the
//! flag is present as `"true"` while the user wants to stay connected and absent otherwise.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use evote_ledger_core::{PortError, ReconnectStorePort, RECONNECT_FLAG_KEY};

use crate::EvoteAdapterConfig;

const FLAG_SET: &str = "true";

type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct FileReconnectStore {
    path: PathBuf,
    key: String,
}

impl FileReconnectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: RECONNECT_FLAG_KEY.to_owned(),
        }
    }

    pub fn with_config(config: &EvoteAdapterConfig, default_path: &Path) -> Self {
        Self {
            path: config
                .reconnect_store_path
                .clone()
                .unwrap_or_else(|| default_path.to_path_buf()),
            key: config.reconnect_flag_key.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, PortError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(PortError::Transport(format!(
                    "read {} failed: {e}",
                    self.path.display()
                )))
            }
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            PortError::Validation(format!("corrupt store {}: {e}", self.path.display()))
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), PortError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                PortError::Transport(format!("create {} failed: {e}", parent.display()))
            })?;
        }
        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| PortError::Validation(format!("store serialization failed: {e}")))?;
        fs::write(&self.path, body).map_err(|e| {
            PortError::Transport(format!("write {} failed: {e}", self.path.display()))
        })
    }
}

impl ReconnectStorePort for FileReconnectStore {
    fn load_intent(&self) -> Result<bool, PortError> {
        let entries = self.read_entries()?;
        Ok(entries.get(&self.key).map(String::as_str) == Some(FLAG_SET))
    }

    fn store_intent(&self, connected: bool) -> Result<(), PortError> {
        let mut entries = self.read_entries()?;
        let changed = if connected {
            entries.insert(self.key.clone(), FLAG_SET.to_owned()).as_deref() != Some(FLAG_SET)
        } else {
            entries.remove(&self.key).is_some()
        };
        if !changed {
            return Ok(());
        }
        tracing::debug!(path = %self.path.display(), connected, "persisting reconnect intent");
        self.write_entries(&entries)
    }
}

#[derive(Debug, Clone)]
pub struct MemoryReconnectStore {
    key: String,
    entries: Arc<Mutex<Entries>>,
}

impl Default for MemoryReconnectStore {
    fn default() -> Self {
        Self {
            key: RECONNECT_FLAG_KEY.to_owned(),
            entries: Arc::new(Mutex::new(Entries::new())),
        }
    }
}

impl MemoryReconnectStore {
    pub fn raw(&self, key: &str) -> Result<Option<String>, PortError> {
        let g = self
            .entries
            .lock()
            .map_err(|e| PortError::Transport(format!("store lock poisoned: {e}")))?;
        Ok(g.get(key).cloned())
    }
}

impl ReconnectStorePort for MemoryReconnectStore {
    fn load_intent(&self) -> Result<bool, PortError> {
        Ok(self.raw(&self.key)?.as_deref() == Some(FLAG_SET))
    }

    fn store_intent(&self, connected: bool) -> Result<(), PortError> {
        let mut g = self
            .entries
            .lock()
            .map_err(|e| PortError::Transport(format!("store lock poisoned: {e}")))?;
        if connected {
            g.insert(self.key.clone(), FLAG_SET.to_owned());
        } else {
            g.remove(&self.key);
        }
        Ok(())
    }
}
