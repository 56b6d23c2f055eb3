//! # Observability
//!
//! Structured logging for the addressing core and its tools. Library code
//! emits `tracing` events; applications install a subscriber once through
//! [`init_logging`].
//!
//! ```rust,ignore
//! use sbsa_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::debug!(capacity = 840, "hypercube ready");
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
