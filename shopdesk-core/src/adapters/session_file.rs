//! File-backed session store (session.json in the app directory)

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value as JsonValue};

use crate::domain::result::{Error, Result};
use crate::ports::SessionStore;

pub const SESSION_FILE: &str = "session.json";

/// Session store persisted as a single JSON object
///
/// Keys this crate does not know about are preserved on every write.
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(app_dir: &Path) -> Self {
        Self::at(app_dir.join(SESSION_FILE))
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, JsonValue>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            JsonValue::Object(map) => Ok(map),
            _ => Err(Error::storage(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, map: &Map<String, JsonValue>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Map<String, JsonValue>)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::storage("session store lock poisoned"))?;
        let mut map = self.read_all()?;
        apply(&mut map);
        self.write_all(&map)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        self.update(|map| {
            map.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| {
            map.remove(key);
        })
    }

    fn write_batch(&self, writes: Vec<(&str, Option<JsonValue>)>) -> Result<()> {
        if !self.path.exists() && writes.iter().all(|(_, value)| value.is_none()) {
            return Ok(());
        }
        self.update(|map| {
            for (key, value) in writes {
                match value {
                    Some(value) => map.insert(key.to_string(), value),
                    None => map.remove(key),
                };
            }
        })
    }
}
