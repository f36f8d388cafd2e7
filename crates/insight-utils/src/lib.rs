//! Shared utilities for stock-insight
//!
//! Logging setup and its configuration, used by the `stock-insight` binary.

pub mod config;
pub mod logging;

pub use config::{LogConfig, LogFormat};
pub use logging::init_tracing_with;
