/// Key-value storage capability over chrome.storage
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::bridge;
use crate::error::StorageError;

/// Which chrome.storage area a store reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Local,
    Sync,
}

impl StorageArea {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageArea::Local => "local",
            StorageArea::Sync => "sync",
        }
    }
}

/// Minimal async key-value store holding JSON values
///
/// A missing key reads as `None`. A write replaces the whole value.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get(key).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    async fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.set(key, serde_json::to_value(value)?).await
    }
}

/// chrome.storage backed store, reached through popup.js
#[derive(Debug, Clone, Copy)]
pub struct ChromeStorage {
    area: StorageArea,
}

impl ChromeStorage {
    pub fn local() -> Self {
        ChromeStorage { area: StorageArea::Local }
    }

    pub fn sync() -> Self {
        ChromeStorage { area: StorageArea::Sync }
    }
}

impl KeyValueStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let value_js = bridge::get_storage(self.area.as_str(), key)
            .await
            .map_err(|e| StorageError::Bridge(bridge::describe_js_error(&e)))?;

        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| StorageError::Codec(e.to_string()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        // Plain objects rather than ES Maps, so chrome.storage can persist them
        let value_js = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StorageError::Codec(e.to_string()))?;

        bridge::set_storage(self.area.as_str(), key, value_js)
            .await
            .map_err(|e| StorageError::Bridge(bridge::describe_js_error(&e)))
    }
}

/// In-memory store, used in tests and as a stand-in outside the extension
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_entry(self, key: &str, value: Value) -> Self {
        self.entries.borrow_mut().insert(key.to_string(), value);
        self
    }

    /// Current raw value for a key
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_memory_store_missing_key() {
        let store = MemoryStore::new();
        let value = block_on(store.get("nothing")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_memory_store_set_replaces_value() {
        let store = MemoryStore::new().with_entry("k", json!([1, 2]));

        block_on(store.set("k", json!([3]))).unwrap();

        assert_eq!(store.peek("k"), Some(json!([3])));
    }

    #[test]
    fn test_get_as_typed() {
        let store = MemoryStore::new().with_entry("geminiApiKey", json!("secret"));

        let key: Option<String> = block_on(store.get_as("geminiApiKey")).unwrap();

        assert_eq!(key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_get_as_null_is_none() {
        let store = MemoryStore::new().with_entry("geminiApiKey", Value::Null);
        let key: Option<String> = block_on(store.get_as("geminiApiKey")).unwrap();
        assert!(key.is_none());
    }

    #[test]
    fn test_get_as_wrong_shape_is_error() {
        let store = MemoryStore::new().with_entry("geminiApiKey", json!({"nested": true}));
        let result: Result<Option<String>, _> = block_on(store.get_as("geminiApiKey"));
        assert!(matches!(result, Err(StorageError::Serde(_))));
    }

    #[test]
    fn test_storage_area_names() {
        assert_eq!(ChromeStorage::local().area.as_str(), "local");
        assert_eq!(ChromeStorage::sync().area.as_str(), "sync");
    }
}
