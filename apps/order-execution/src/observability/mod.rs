//! Structured logging for the execution engine.

mod tracing;

pub use self::tracing::{TracingError, init_tracing};
