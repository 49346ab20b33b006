use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::ports::SessionStore;

/// Session store that lives only as long as the value
#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, JsonValue>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .lock()
            .map(|v| v.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let values = self
            .values
            .lock()
            .map_err(|_| Error::storage("session store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| Error::storage("session store lock poisoned"))?
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| Error::storage("session store lock poisoned"))?
            .remove(key);
        Ok(())
    }

    fn write_batch(&self, writes: Vec<(&str, Option<JsonValue>)>) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| Error::storage("session store lock poisoned"))?;
        for (key, value) in writes {
            match value {
                Some(value) => values.insert(key.to_string(), value),
                None => values.remove(key),
            };
        }
        Ok(())
    }
}
