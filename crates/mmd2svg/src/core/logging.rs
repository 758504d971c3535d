//! Logging infrastructure for diagram conversion
//!
//! Structured logging uses the `tracing` crate. The batch pipeline opens a
//! `batch_run` span per invocation and a `batch_item` span per file; renderer
//! adapters add their own spans underneath.
//!
//! # Usage
//!
//! ```rust
//! use mmd2svg::core::logging::init_logging;
//!
//! // Level and format from the environment, or warn/compact
//! let _ = init_logging(None, None);
//! ```
//!
//! # Environment Variables
//!
//! - `MMD2SVG_LOG_LEVEL`: log level (trace|debug|info|warn|error|off)
//! - `RUST_LOG`: standard `EnvFilter` directives, used when the above is unset
//! - `MMD2SVG_LOG_FORMAT`: log format (compact|pretty|json)
//!
//! Logs are written to stderr. Stdout belongs to conversion progress output.
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the pipeline at debug level
//! RUST_LOG="mmd2svg::batch::pipeline=debug" mmd2svg docs/ -o out/
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Default log level when nothing else is configured
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "MMD2SVG_LOG_LEVEL";
/// Environment variable holding the log format
pub const LOG_FORMAT_ENV: &str = "MMD2SVG_LOG_FORMAT";

/// Pick the filter directive: explicit, then `MMD2SVG_LOG_LEVEL`, then `RUST_LOG`
fn resolve_level<F>(explicit: Option<&str>, env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .map(str::to_string)
        .or_else(|| env(LOG_LEVEL_ENV))
        .or_else(|| env("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

fn resolve_format<F>(explicit: Option<&str>, env: F) -> Result<LogFormat, String>
where
    F: Fn(&str) -> Option<String>,
{
    let name = explicit
        .map(str::to_string)
        .or_else(|| env(LOG_FORMAT_ENV))
        .unwrap_or_else(|| "compact".to_string());
    LogFormat::from_str(&name)
}

/// An unparsable directive degrades to [`DEFAULT_LOG_LEVEL`]
fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Initialize the tracing subscriber with the given log level and format
///
/// # Arguments
///
/// * `level` - Optional log level string. If None, uses `MMD2SVG_LOG_LEVEL`,
///   then `RUST_LOG`, then [`DEFAULT_LOG_LEVEL`].
/// * `format` - Optional log format (compact|pretty|json). If None, uses
///   `MMD2SVG_LOG_FORMAT`, then `compact`.
///
/// # Errors
///
/// Returns an error for an unknown format, or when a global subscriber has
/// already been installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let env = |key: &str| std::env::var(key).ok();
    let format =
        resolve_format(format, env).map_err(|e| format!("Invalid log format: {}", e))?;
    let filter = build_filter(&resolve_level(level, env));

    let registry = Registry::default().with(filter);
    let layer = fmt::Layer::default().with_writer(std::io::stderr);

    match format {
        LogFormat::Compact => registry
            .with(
                layer
                    .compact()
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                layer
                    .pretty()
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(layer.json().with_span_events(FmtSpan::CLOSE))
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
    }

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_level_resolution_order() {
        let both = env_of(&[(LOG_LEVEL_ENV, "debug"), ("RUST_LOG", "trace")]);
        assert_eq!(resolve_level(Some("error"), &both), "error");
        assert_eq!(resolve_level(None, &both), "debug");
        assert_eq!(resolve_level(None, env_of(&[("RUST_LOG", "trace")])), "trace");
        assert_eq!(resolve_level(None, env_of(&[])), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(resolve_format(None, env_of(&[])), Ok(LogFormat::Compact));
        assert_eq!(
            resolve_format(None, env_of(&[(LOG_FORMAT_ENV, "json")])),
            Ok(LogFormat::Json)
        );
        assert_eq!(
            resolve_format(Some("pretty"), env_of(&[(LOG_FORMAT_ENV, "json")])),
            Ok(LogFormat::Pretty)
        );
        assert!(resolve_format(Some("xml"), env_of(&[])).is_err());
    }

    #[test]
    fn test_bad_directive_falls_back() {
        let filter = build_filter("mmd2svg=loud");
        assert_eq!(filter.to_string(), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_log_format_variants() {
        let variants = LogFormat::variants();
        assert_eq!(variants.len(), 3);
        assert!(variants.contains(&"pretty"));
    }
}
