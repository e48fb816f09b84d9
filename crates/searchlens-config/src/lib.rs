//! # searchlens config
//!
//! Two configuration layers:
//!
//! - [`Settings`]: the TOML settings file for the process (endpoints, browser
//!   options, polling bounds), loaded once at startup by [`SettingsLoader`].
//! - [`ConfigStore`](searchlens_protocols::store::ConfigStore) implementations:
//!   the user-editable key/value store read fresh on every request.

mod error;
mod loader;
mod schema;
mod store;
mod validator;

pub use error::ConfigError;
pub use loader::SettingsLoader;
pub use schema::*;
pub use store::{seed_defaults, JsonFileStore, MemoryStore};
pub use validator::{SettingsValidator, ValidationError, ValidationResult, ValidationWarning};
