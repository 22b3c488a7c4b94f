// Persistence bridge.
// The organizer reads the pinned layout at startup and writes it back on
// every structural mutation. The contract is a flat key-value store over
// JSON values; the file-backed implementation keeps the whole store in one
// JSON object at the platform config path.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::platform;
use crate::types::errors::StoreError;

/// Store key for the ordered list of pinned tab records.
pub const KEY_PINNED_TABS: &str = "pinnedTabs";
/// Store key for the list of folder records.
pub const KEY_FOLDERS: &str = "folders";
/// Store key for user-facing shell settings.
pub const KEY_SETTINGS: &str = "settings";

/// Trait defining the persisted settings store interface.
pub trait SettingsStore: Send {
    /// Returns the stored value for `key`, or `default` if absent.
    fn get(&self, key: &str, default: Value) -> Value;
    /// Stores `value` under `key`. Implementations persist immediately;
    /// no debouncing is required by contract.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// In-memory store for tests and the headless binary.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str, default: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// File-backed store holding all keys in a single JSON object.
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, Value>,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading existing contents if present.
    /// A missing or malformed file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, Value>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("store file {} is malformed, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }

    /// Opens the store at the platform config directory.
    pub fn at_default_location() -> Self {
        Self::open(platform::get_config_dir().join("shell.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write strategy: serialize to a temp file, then rename, so a
    /// crash never leaves a half-written store.
    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str, default: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}
