//! Core errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Provider already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),
}
