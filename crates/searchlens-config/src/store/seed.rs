//! First-run default seeding.

use serde_json::Value;
use tracing::info;

use searchlens_protocols::error::StoreError;
use searchlens_protocols::store::{keys, ConfigStore, StoreValues};

use crate::schema::DefaultsSettings;

/// Write each default whose key is absent from `store`. Existing values,
/// including ones the user set to empty or false, are left untouched.
///
/// Returns the keys that were written.
pub async fn seed_defaults(
    store: &dyn ConfigStore,
    defaults: &DefaultsSettings,
) -> Result<Vec<String>, StoreError> {
    let existing = store.get(keys::ALL).await?;

    let mut candidates = StoreValues::new();
    candidates.insert(keys::ENABLED.to_string(), Value::Bool(defaults.enabled));
    candidates.insert(keys::PROVIDER.to_string(), Value::from(defaults.provider.clone()));
    candidates.insert(keys::MODEL.to_string(), Value::from(defaults.model.clone()));
    candidates.insert(keys::MAX_TOKENS.to_string(), Value::from(defaults.max_tokens));
    if let Some(prefix) = &defaults.prompt_prefix {
        candidates.insert(keys::PROMPT_PREFIX.to_string(), Value::from(prefix.clone()));
    }
    candidates.insert(
        keys::AUTH_TOKEN.to_string(),
        Value::from(defaults.auth_token.clone().unwrap_or_default()),
    );

    let missing: StoreValues = candidates
        .into_iter()
        .filter(|(k, _)| !existing.contains_key(k))
        .collect();

    if missing.is_empty() {
        return Ok(Vec::new());
    }

    let written: Vec<String> = missing.keys().cloned().collect();
    store.set(missing).await?;
    info!("Seeded default config keys: {:?}", written);
    Ok(written)
}
