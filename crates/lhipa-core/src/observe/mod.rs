//! # Observability
//!
//! Logging setup for applications embedding the analysis. Pipeline stages
//! emit `tracing` events; this module decides where they go.
//!
//! ```text
//! compute_lhipa ──► tracing::debug!/trace!/warn! ──► EnvFilter ──► fmt layer ──► stderr
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
