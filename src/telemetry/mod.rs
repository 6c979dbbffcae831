//! Tracing setup for neonbx.
//!
//! Diagnostic logs go to stderr through `tracing`; user-facing output is
//! printed separately by `cli::output`.

mod init;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
