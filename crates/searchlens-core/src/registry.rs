//! Registry of answer provider strategies.

use std::sync::Arc;

use dashmap::DashMap;

use searchlens_protocols::provider::AnswerProvider;
use searchlens_protocols::types::ProviderKind;

use crate::error::CoreError;

/// Answer providers keyed by the strategy they implement.
pub struct ProviderRegistry {
    providers: DashMap<ProviderKind, Arc<dyn AnswerProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    /// Register a provider under its own kind.
    pub fn register(&self, provider: Arc<dyn AnswerProvider>) -> Result<(), CoreError> {
        let kind = provider.kind();

        if self.providers.contains_key(&kind) {
            return Err(CoreError::AlreadyRegistered(kind.to_string()));
        }

        self.providers.insert(kind, provider);
        Ok(())
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn AnswerProvider>> {
        self.providers.get(&kind).map(|p| p.clone())
    }

    /// Like [`get`](Self::get) but reports a missing provider as an error.
    pub fn require(&self, kind: ProviderKind) -> Result<Arc<dyn AnswerProvider>, CoreError> {
        self.get(kind)
            .ok_or_else(|| CoreError::ProviderNotFound(kind.to_string()))
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| *p.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
