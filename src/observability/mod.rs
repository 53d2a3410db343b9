//! # Observability
//!
//! Structured logging for the material engine via the `tracing` ecosystem.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingConfig};
