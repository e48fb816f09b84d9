use serde_json::json;
use tempfile::TempDir;

use searchlens_protocols::store::{keys, ConfigStore, StoreValues};
use searchlens_protocols::types::ProviderKind;

use super::*;
use crate::schema::DefaultsSettings;

fn values(v: serde_json::Value) -> StoreValues {
    v.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_memory_store_get_only_present_keys() {
    let store = MemoryStore::with_values(values(json!({"model": "m1"})));
    let got = store.get(&["model", "maxTokens"]).await.unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got["model"], "m1");
}

#[tokio::test]
async fn test_memory_store_set_merges() {
    let store = MemoryStore::new();
    store.set(values(json!({"model": "m1", "maxTokens": 10}))).await.unwrap();
    store.set(values(json!({"maxTokens": 20}))).await.unwrap();
    let snapshot = store.snapshot();
    assert_eq!(snapshot["model"], "m1");
    assert_eq!(snapshot["maxTokens"], 20);
}

#[tokio::test]
async fn test_is_enabled_defaults_true() {
    let store = MemoryStore::new();
    assert!(store.is_enabled().await.unwrap());

    store.set(values(json!({"extensionEnabled": false}))).await.unwrap();
    assert!(!store.is_enabled().await.unwrap());
}

#[tokio::test]
async fn test_file_store_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("store.json"));
    let got = store.get(keys::ALL).await.unwrap();
    assert!(got.is_empty());
}

#[tokio::test]
async fn test_file_store_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");

    let store = JsonFileStore::new(&path);
    store
        .set(values(json!({"answerProvider": "scrape", "authToken": "sk-1"})))
        .await
        .unwrap();

    let reopened = JsonFileStore::new(&path);
    let config = reopened.load_config().await.unwrap();
    assert_eq!(config.provider, ProviderKind::Scrape);
    assert_eq!(config.auth_token, "sk-1");
}

#[tokio::test]
async fn test_file_store_rejects_non_object() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.get(&["model"]).await.is_err());
}

#[tokio::test]
async fn test_seed_writes_only_missing_keys() {
    let store = MemoryStore::with_values(values(json!({
        "extensionEnabled": false,
        "model": "custom/model"
    })));

    let written = seed_defaults(&store, &DefaultsSettings::default()).await.unwrap();
    assert!(written.contains(&"maxTokens".to_string()));
    assert!(!written.contains(&"model".to_string()));
    assert!(!written.contains(&"promptPrefix".to_string()));

    let snapshot = store.snapshot();
    assert_eq!(snapshot["extensionEnabled"], false);
    assert_eq!(snapshot["model"], "custom/model");
    assert_eq!(snapshot["maxTokens"], 2048);
    assert_eq!(snapshot["authToken"], "");
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let store = MemoryStore::new();
    let first = seed_defaults(&store, &DefaultsSettings::default()).await.unwrap();
    assert!(!first.is_empty());
    let second = seed_defaults(&store, &DefaultsSettings::default()).await.unwrap();
    assert!(second.is_empty());
}
