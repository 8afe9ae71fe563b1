//! # Observability
//!
//! Tracing setup and pipeline metrics.
//!
//! ## Features
//!
//! - Tracing initialization (JSON/Pretty/Compact), always on stderr so the
//!   sketch can be streamed to stdout
//! - Prometheus recorder rendered to a text file at the end of a run
//! - Per-run [`GenerationSummary`]
//!
//! ## Example
//!
//! ```ignore
//! let handle = observability::install_metrics_recorder()?;
//! observability::metrics::record_modules_resolved(3);
//! observability::write_metrics(&handle, Path::new("metrics.prom"))?;
//! ```

pub mod metrics;

use std::path::Path;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_build, record_dependencies, record_modules_resolved, record_plugin_run,
    record_ports, record_sketch_written, record_stage_duration, record_types_discovered,
    GenerationSummary,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Level used when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Ignore `RUST_LOG` and use `default_log_level`
    pub force_level: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            default_log_level: "info".to_string(),
            force_level: false,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    if config.force_level {
        EnvFilter::new(&config.default_log_level)
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level))
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = build_filter(config);

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(log_format = ?config.log_format, "logging initialized");
    Ok(())
}

/// Install the Prometheus recorder as the global metrics recorder.
///
/// No HTTP listener is started; render the handle when the run ends.
pub fn install_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    tracing::debug!("Prometheus recorder installed");
    Ok(handle)
}

/// Render all recorded metrics in Prometheus text format to `path`.
pub fn write_metrics(handle: &PrometheusHandle, path: &Path) -> Result<()> {
    let rendered = handle.render();
    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    tracing::info!(path = %path.display(), "metrics written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.default_log_level, "info");
        assert!(!config.force_level);
    }

    #[test]
    fn test_forced_filter_ignores_env() {
        let config = ObservabilityConfig {
            default_log_level: "warn".into(),
            force_level: true,
            ..Default::default()
        };
        assert_eq!(build_filter(&config).to_string(), "warn");
    }

    #[test]
    fn test_write_metrics_renders_recorded_values() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        ::metrics::with_local_recorder(&recorder, || {
            record_modules_resolved(3);
            record_plugin_run("csv", 0.5);
        });

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("metrics.prom");
        write_metrics(&handle, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("sketchgen_modules_resolved"), "got: {text}");
        assert!(text.contains("sketchgen_plugins_run_total{plugin=\"csv\"} 1"), "got: {text}");
    }
}
