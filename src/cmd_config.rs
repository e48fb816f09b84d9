//! Key/value store commands: `status`, `toggle` and `config`.

use anyhow::bail;
use serde_json::Value;

use searchlens_config::Settings;
use searchlens_protocols::store::{ConfigStore, StoreValues, keys};
use searchlens_protocols::types::{ExtensionConfig, ProviderKind};

use crate::cli::ConfigAction;
use crate::register::open_store;

pub(crate) async fn status(settings: &Settings) -> anyhow::Result<()> {
    let store = open_store(settings).await?;
    let config = store.load_config().await?;

    println!("Enabled:  {}", config.enabled);
    println!("Provider: {}", config.provider);
    println!("Model:    {}", config.model);
    Ok(())
}

/// Flip the enabled flag. Open pages learn about it on their next
/// `get-status`; only a running bridge broadcasts changes.
pub(crate) async fn toggle(settings: &Settings) -> anyhow::Result<()> {
    let store = open_store(settings).await?;
    let enabled = !store.is_enabled().await?;

    let mut values = StoreValues::new();
    values.insert(keys::ENABLED.to_string(), Value::Bool(enabled));
    store.set(values).await?;

    println!("searchlens {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

pub(crate) async fn handle_config_command(
    settings: &Settings,
    action: ConfigAction,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => show(settings).await,
        ConfigAction::Set { key, value } => set(settings, &key, value).await,
    }
}

async fn show(settings: &Settings) -> anyhow::Result<()> {
    let store = open_store(settings).await?;
    let values = store.get(keys::ALL).await?;

    println!("{}", serde_json::to_string_pretty(&redacted(values))?);
    println!("# store: {}", settings.store.path.display());
    Ok(())
}

async fn set(settings: &Settings, key: &str, raw: String) -> anyhow::Result<()> {
    if !keys::ALL.contains(&key) {
        bail!("Unknown key '{}' (expected one of {})", key, keys::ALL.join(", "));
    }
    let value = parse_value(key, raw)?;

    let store = open_store(settings).await?;
    let mut values = StoreValues::new();
    values.insert(key.to_string(), value.clone());
    store.set(values).await?;

    if key == keys::AUTH_TOKEN {
        println!("{} updated", key);
    } else {
        println!("{} = {}", key, value);
    }
    Ok(())
}

/// JSON when it parses, otherwise a plain string. Text keys always stay strings
/// so that e.g. a model named `123` is not stored as a number.
fn parse_value(key: &str, raw: String) -> anyhow::Result<Value> {
    let text_key = matches!(
        key,
        keys::PROVIDER | keys::MODEL | keys::PROMPT_PREFIX | keys::AUTH_TOKEN
    );
    let value = if text_key {
        Value::String(raw)
    } else {
        serde_json::from_str(&raw).unwrap_or(Value::String(raw))
    };

    match key {
        keys::PROVIDER => {
            if value.as_str().and_then(ProviderKind::parse).is_none() {
                bail!("answerProvider must be 'direct' or 'scrape'");
            }
        }
        keys::ENABLED if !value.is_boolean() => bail!("extensionEnabled must be true or false"),
        keys::MAX_TOKENS if !value.as_u64().is_some_and(|n| n > 0) => {
            bail!("maxTokens must be a positive integer")
        }
        _ => {}
    }
    Ok(value)
}

fn redacted(mut values: StoreValues) -> StoreValues {
    let token = values
        .get(keys::AUTH_TOKEN)
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(|t| {
            ExtensionConfig {
                auth_token: t.to_string(),
                ..Default::default()
            }
            .redacted_token()
        });
    if let Some(token) = token {
        values.insert(keys::AUTH_TOKEN.to_string(), Value::String(token));
    }
    values
}
