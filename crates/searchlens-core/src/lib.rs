//! # searchlens core
//!
//! Orchestration between page contexts and answer providers:
//!
//! ```text
//! page ──search-detected──► Router ──► Dispatcher ──► AnswerProvider
//!  ▲                                                      │
//!  └──────────display-answer────── ResponseRelay ◄────────┘
//! ```

mod bus;
mod dispatcher;
mod error;
mod registry;
mod relay;
mod router;

pub use bus::LocalBus;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::CoreError;
pub use registry::ProviderRegistry;
pub use relay::ResponseRelay;
pub use router::Router;

#[cfg(test)]
#[path = "test_support.rs"]
mod test_support;
