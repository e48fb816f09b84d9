//! # searchlens protocols
//!
//! Shared vocabulary for the searchlens orchestrator: the request/response data
//! model, the error taxonomy, the message bus schema, and the traits every
//! pluggable part implements.
//!
//! - [`provider::AnswerProvider`]: one strategy for producing an answer
//! - [`store::ConfigStore`]: async key/value settings store
//! - [`bus::MessageBus`]: delivery of named messages to page contexts
//! - [`provider::Connectivity`]: network availability preflight

pub mod bus;
pub mod challenge;
pub mod error;
pub mod provider;
pub mod store;
pub mod types;

pub use tokio_util::sync::CancellationToken;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::bus::{BusMessage, BusReply, MessageBus, ReplyStatus};
    pub use crate::error::{AnswerError, BusError, StoreError};
    pub use crate::provider::{AnswerProvider, Connectivity, OriginalPageOpener};
    pub use crate::store::{ConfigStore, StoreValues};
    pub use crate::types::{
        ContextId, ExtensionConfig, PayloadKind, ProviderKind, ResponsePayload, SearchRequest,
    };
    pub use crate::CancellationToken;
}
