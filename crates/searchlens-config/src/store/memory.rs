//! In-memory store.

use async_trait::async_trait;
use parking_lot::RwLock;

use searchlens_protocols::error::StoreError;
use searchlens_protocols::store::{ConfigStore, StoreValues};

/// Store held entirely in memory. Used by one-shot commands and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<StoreValues>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `values`.
    pub fn with_values(values: StoreValues) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    /// Snapshot of every stored value.
    pub fn snapshot(&self) -> StoreValues {
        self.values.read().clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreValues, StoreError> {
        let values = self.values.read();
        Ok(keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, values: StoreValues) -> Result<(), StoreError> {
        self.values.write().extend(values);
        Ok(())
    }
}
