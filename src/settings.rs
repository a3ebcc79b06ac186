//! Settings store shared by the host and all extensions.
//!
//! Settings are a flat key/value map. Extension keys are namespaced as
//! `<extensionId>.<name>` (see [`extension_setting_key`]); host-wide keys live
//! under `general.`. Every write is broadcast as a [`SettingChanged`] event so
//! the extension host can rescan the extensions that depend on the key.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::{LumenError, LumenResult};

/// Host-wide UI language, e.g. `en-US`.
pub const GENERAL_LANGUAGE_KEY: &str = "general.language";

/// Global hotkey accelerator, e.g. `Alt+Space`.
pub const GENERAL_HOTKEY_KEY: &str = "general.hotkey";

/// Ids of the results the user marked as favorites.
pub const FAVORITES_KEY: &str = "favorites";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Build the fully-qualified settings key of an extension setting.
pub fn extension_setting_key(extension_id: &str, key: &str) -> String {
    format!("{}.{}", extension_id, key)
}

/// Notification sent after a setting was written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChanged {
    pub key: String,
}

/// Key/value settings service.
///
/// Reads are synchronous and cheap; extensions call them on every query cycle.
pub trait SettingsManager: Send + Sync {
    /// Raw stored value, `None` if the key was never written.
    fn get_raw(&self, key: &str) -> Option<Value>;

    /// Store a value and notify subscribers.
    fn set_value(&self, key: &str, value: Value) -> LumenResult<()>;

    /// Remove a value and notify subscribers.
    fn remove(&self, key: &str) -> LumenResult<()>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SettingChanged>;
}

/// Typed accessors on top of [`SettingsManager`].
pub trait SettingsManagerExt: SettingsManager {
    /// Typed read with a fallback.
    ///
    /// A stored value that does not deserialize into `T` is logged and the
    /// default is returned. Secret values are never written to the log.
    fn get_value<T: DeserializeOwned>(&self, key: &str, default: T, is_secret: bool) -> T {
        self.get_optional_value(key, is_secret).unwrap_or(default)
    }

    /// Typed read without a fallback.
    fn get_optional_value<T: DeserializeOwned>(&self, key: &str, is_secret: bool) -> Option<T> {
        let raw = self.get_raw(key)?;
        let shown = if is_secret {
            "<secret>".to_string()
        } else {
            raw.to_string()
        };

        match serde_json::from_value(raw) {
            Ok(value) => {
                tracing::trace!("Read setting '{}' = {}", key, shown);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Ignoring invalid value {} for setting '{}': {}", shown, key, e);
                None
            }
        }
    }
}

impl<S: SettingsManager + ?Sized> SettingsManagerExt for S {}

/// Settings backed by a JSON file.
///
/// Values are cached in memory and the file is rewritten on every change.
/// Without a path the store is memory-only.
pub struct JsonFileSettingsManager {
    /// Path to the settings file, `None` for a memory-only store.
    path: Option<PathBuf>,
    /// In-memory cache of stored values.
    cache: RwLock<BTreeMap<String, Value>>,
    changes: broadcast::Sender<SettingChanged>,
}

impl JsonFileSettingsManager {
    /// Open the settings file, starting empty if it does not exist yet.
    pub fn open(path: PathBuf) -> LumenResult<Self> {
        let cache = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    LumenError::Settings(format!(
                        "Failed to parse settings file {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Loaded {} settings from {}", cache.len(), path.display());
        Ok(Self::with_cache(Some(path), cache))
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::with_cache(None, BTreeMap::new())
    }

    fn with_cache(path: Option<PathBuf>, cache: BTreeMap<String, Value>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            path,
            cache: RwLock::new(cache),
            changes,
        }
    }

    /// All keys currently stored.
    pub fn keys(&self) -> Vec<String> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    fn write_file(&self, cache: &BTreeMap<String, Value>) -> LumenResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LumenError::Settings(format!(
                    "Failed to create settings directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(cache)?;
        fs::write(path, contents).map_err(|e| {
            LumenError::Settings(format!(
                "Failed to write settings file {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn notify(&self, key: &str) {
        // No subscribers is fine.
        let _ = self.changes.send(SettingChanged {
            key: key.to_string(),
        });
    }
}

impl SettingsManager for JsonFileSettingsManager {
    fn get_raw(&self, key: &str) -> Option<Value> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set_value(&self, key: &str, value: Value) -> LumenResult<()> {
        {
            let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
            if cache.get(key) == Some(&value) {
                return Ok(());
            }
            // The cache only changes once the file was written.
            let mut updated = cache.clone();
            updated.insert(key.to_string(), value);
            self.write_file(&updated)?;
            *cache = updated;
        }

        tracing::debug!("Setting '{}' changed", key);
        self.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> LumenResult<()> {
        {
            let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
            if !cache.contains_key(key) {
                return Ok(());
            }
            let mut updated = cache.clone();
            updated.remove(key);
            self.write_file(&updated)?;
            *cache = updated;
        }

        tracing::debug!("Setting '{}' removed", key);
        self.notify(key);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingChanged> {
        self.changes.subscribe()
    }
}
