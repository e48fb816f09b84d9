//! JSON file backed store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use searchlens_protocols::error::StoreError;
use searchlens_protocols::store::{ConfigStore, StoreValues};

/// Store persisted as a single JSON object on disk.
///
/// Every `get` re-reads the file so edits made by another process are seen by
/// the next request. Writes are serialised and replace the file atomically.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<StoreValues, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(StoreValues::new()),
            Ok(content) => {
                let value: serde_json::Value = serde_json::from_str(&content)?;
                match value {
                    serde_json::Value::Object(map) => Ok(map),
                    _ => Err(StoreError::InvalidValue {
                        key: self.path.display().to_string(),
                        message: "store file must contain a JSON object".to_string(),
                    }),
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreValues::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, values: &StoreValues) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(values)?;
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreValues, StoreError> {
        let mut all = self.read_all().await?;
        Ok(keys
            .iter()
            .filter_map(|k| all.remove(*k).map(|v| (k.to_string(), v)))
            .collect())
    }

    async fn set(&self, values: StoreValues) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read_all().await?;
        let changed: Vec<String> = values.keys().cloned().collect();
        all.extend(values);
        self.write_all(&all).await?;
        debug!("Store {} updated keys {:?}", self.path.display(), changed);
        Ok(())
    }
}
