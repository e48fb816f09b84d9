//! Error types for the searchlens protocol layer.

mod answer;
mod bus;
mod store;

pub use answer::*;
pub use bus::*;
pub use store::*;
