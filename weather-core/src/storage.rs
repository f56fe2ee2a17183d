//! Best-effort string key-value persistence.
//!
//! The screen only keeps one entry here, the last selected city. Callers treat
//! every failure as "nothing stored" and carry on.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{collections::HashMap, fmt::Debug, path::PathBuf};
use tokio::sync::Mutex;

/// Key under which the last selected city name is stored.
pub const LAST_CITY_KEY: &str = "city";

#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores all entries as a single JSON object in one file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    async fn read_all(&self) -> Result<HashMap<String, String>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read store: {}", self.path.display()));
            }
        };

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store: {}", self.path.display()))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize store")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write store: {}", self.path.display()))?;

        Ok(())
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let entries = HashMap::from([(key.to_string(), value.to_string())]);
        Self { entries: Mutex::new(entries) }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("state.json"));

        assert_eq!(store.get(LAST_CITY_KEY).await.expect("get succeeds"), None);
    }

    #[tokio::test]
    async fn file_store_last_write_wins_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data").join("state.json");

        let store = FileStore::new(&path);
        store.set(LAST_CITY_KEY, "Paris").await.expect("set succeeds");
        store.set(LAST_CITY_KEY, "London").await.expect("set succeeds");
        store.set("other", "value").await.expect("set succeeds");

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(LAST_CITY_KEY).await.expect("get succeeds").as_deref(), Some("London"));
        assert_eq!(reopened.get("other").await.expect("get succeeds").as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").expect("write fixture");

        let store = FileStore::new(&path);
        assert!(store.get(LAST_CITY_KEY).await.is_err());
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::with_entry(LAST_CITY_KEY, "Paris");
        assert_eq!(store.get(LAST_CITY_KEY).await.expect("get succeeds").as_deref(), Some("Paris"));

        store.set(LAST_CITY_KEY, "Rome").await.expect("set succeeds");
        assert_eq!(store.get(LAST_CITY_KEY).await.expect("get succeeds").as_deref(), Some("Rome"));
    }
}
