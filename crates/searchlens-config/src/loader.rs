//! Settings loader.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;
use crate::schema::Settings;

/// Settings loader with environment variable substitution.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load settings from a file, or use defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Settings, ConfigError> {
        if !path.exists() {
            debug!("Settings file {} not found, using defaults", path.display());
            return Ok(Settings::default());
        }
        Self::load(path)
    }

    /// Load settings from a string.
    pub fn load_str(content: &str) -> Result<Settings, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut settings: Settings = toml::from_str(&expanded)?;
        Self::expand_paths(&mut settings);
        Ok(settings)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidValue {
            field: "pattern".to_string(),
            message: e.to_string(),
        })?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    fn expand_paths(settings: &mut Settings) {
        settings.store.path = Self::expand_path_buf(&settings.store.path);
        settings.logging.dir = Self::expand_path_buf(&settings.logging.dir);
        if let Some(dir) = settings.scrape.profile_dir.as_ref() {
            settings.scrape.profile_dir = Some(Self::expand_path_buf(dir));
        }
    }

    fn expand_path_buf(path: &Path) -> PathBuf {
        PathBuf::from(Self::expand_path(&path.to_string_lossy()))
    }

    /// Expand shell-style paths (e.g., `~/.searchlens`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
