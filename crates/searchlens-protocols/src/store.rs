//! Config store protocol.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::ExtensionConfig;

/// Raw key/value pairs as held by a store.
pub type StoreValues = serde_json::Map<String, serde_json::Value>;

/// Persisted configuration keys.
pub mod keys {
    pub const ENABLED: &str = "extensionEnabled";
    pub const PROVIDER: &str = "answerProvider";
    pub const MODEL: &str = "model";
    pub const MAX_TOKENS: &str = "maxTokens";
    pub const PROMPT_PREFIX: &str = "promptPrefix";
    pub const AUTH_TOKEN: &str = "authToken";

    /// Every key that makes up an [`ExtensionConfig`](crate::types::ExtensionConfig).
    pub const ALL: &[&str] = &[ENABLED, PROVIDER, MODEL, MAX_TOKENS, PROMPT_PREFIX, AUTH_TOKEN];
}

/// Asynchronous key/value settings store.
///
/// `get` returns only the keys that are present; absent keys are simply missing
/// from the map.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, keys: &[&str]) -> Result<StoreValues, StoreError>;

    async fn set(&self, values: StoreValues) -> Result<(), StoreError>;

    /// Read every config key and apply defaults.
    async fn load_config(&self) -> Result<ExtensionConfig, StoreError> {
        let values = self.get(keys::ALL).await?;
        Ok(ExtensionConfig::from_values(&values))
    }

    /// Read only the enabled flag.
    async fn is_enabled(&self) -> Result<bool, StoreError> {
        let values = self.get(&[keys::ENABLED]).await?;
        Ok(values
            .get(keys::ENABLED)
            .and_then(|v| v.as_bool())
            .unwrap_or(true))
    }
}
