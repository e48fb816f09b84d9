//! Answer provider protocol.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AnswerError;
use crate::types::{ExtensionConfig, ProviderKind, ResponsePayload, SearchRequest};

/// A strategy that turns a query into exactly one [`ResponsePayload`].
///
/// Implementations never return an error: every failure is mapped into a
/// `ResponsePayload::error` with a readable message before returning.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn answer(
        &self,
        request: &SearchRequest,
        config: &ExtensionConfig,
        cancel: &CancellationToken,
    ) -> ResponsePayload;
}

/// Reports whether the host has network connectivity.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Connectivity that always reports online.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeOnline;

#[async_trait]
impl Connectivity for AssumeOnline {
    async fn is_online(&self) -> bool {
        true
    }
}

/// Opens the chat web application in a context the user can see, so a
/// verification challenge can be completed by hand.
#[async_trait]
pub trait OriginalPageOpener: Send + Sync {
    async fn open_original_page(&self) -> Result<(), AnswerError>;
}
