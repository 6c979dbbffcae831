//! Telemetry initialization.
//!
//! Provides configuration and initialization for the tracing subscriber.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level applied to the `neonbx` target
    pub default_level: Level,
    /// Whether to include file and line numbers
    pub include_file_line: bool,
    /// Whether to include the target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
    /// Custom filter directive (overrides default_level if set)
    pub filter_directive: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            include_file_line: false,
            include_target: false,
            ansi_colors: true,
            filter_directive: None,
        }
    }
}

impl TelemetryConfig {
    /// Configuration for `--verbose`
    pub fn verbose() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_file_line: true,
            include_target: true,
            ..Self::default()
        }
    }
}

/// Guard that keeps the telemetry subscriber active.
pub struct TelemetryGuard {
    #[allow(dead_code)]
    _private: (),
}

/// Initialize telemetry with the given configuration.
///
/// A `RUST_LOG` directive replaces the configured level when set; a malformed
/// one is reported and the configured level is used instead. Output goes to
/// stderr so stdout stays clean for `--json`.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = build_filter(config, rust_log.as_deref())?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .compact();

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(err) = rejected {
        tracing::warn!(error = %err, "ignoring invalid {}", EnvFilter::DEFAULT_ENV);
    }

    Ok(TelemetryGuard { _private: () })
}

/// Pick the filter; returns the parse error of a rejected `RUST_LOG`
fn build_filter(
    config: &TelemetryConfig,
    rust_log: Option<&str>,
) -> anyhow::Result<(EnvFilter, Option<String>)> {
    if let Some(ref directive) = config.filter_directive {
        return Ok((EnvFilter::try_new(directive)?, None));
    }

    let rejected = match rust_log {
        Some(directive) => match EnvFilter::try_new(directive) {
            Ok(filter) => return Ok((filter, None)),
            Err(e) => Some(e.to_string()),
        },
        None => None,
    };

    let filter = EnvFilter::try_new(format!("warn,neonbx={}", config.default_level))?;
    Ok((filter, rejected))
}
