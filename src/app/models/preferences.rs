use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use tracing::warn;

use crate::app::error::Result;
use crate::app::models::json_file::{read_json, write_json_atomic};

/// File name of the preferences document inside the data directory.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Flat key-value preference store backed by one JSON object on disk.
///
/// Clones share the same values. A write that fails to reach the disk is not
/// applied in memory either, so the previous preference stays in effect.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: Arc<Mutex<Map<String, Value>>>,
}

impl Preferences {
    /// Opens the store, starting empty if the file is absent or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_json::<Map<String, Value>>(&path) {
            Ok(values) => values.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Error loading preferences, starting empty");
                Map::new()
            }
        };
        Self {
            path,
            values: Arc::new(Mutex::new(values)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.lock().get(key).and_then(Value::as_bool)
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        self.lock().get(key).and_then(Value::as_i64)
    }

    pub fn string_array(&self, key: &str) -> Vec<String> {
        self.lock()
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.update(|values| {
            values.insert(key.to_string(), value);
        })
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        if !self.contains(key) {
            return Ok(());
        }
        self.update(|values| {
            values.remove(key);
        })
    }

    /// Reads a boolean and deletes the key in the same step.
    pub fn take_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.bool(key) else {
            return Ok(None);
        };
        self.remove(key)?;
        Ok(Some(value))
    }

    /// Applies several changes and persists them as one write.
    pub fn update(&self, change: impl FnOnce(&mut Map<String, Value>)) -> Result<()> {
        let mut values = self.lock();
        let mut next = values.clone();
        change(&mut next);
        write_json_atomic(&self.path, &next)?;
        *values = next;
        Ok(())
    }
}
