//! Key/value config store implementations.

mod file;
mod memory;
mod seed;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use seed::seed_defaults;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
