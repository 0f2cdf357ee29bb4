//! Persistence Adapters
//!
//! Implementations of the order registry. State lives for the lifetime of
//! the process only.

pub mod in_memory;

pub use in_memory::InMemoryOrderManager;
