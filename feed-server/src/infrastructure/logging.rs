use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::fmt::{self, format::FmtSpan, time::UtcTime};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,feed_server=debug";

/// Output shape of the log stream, picked with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, carrying the current span's fields.
    #[default]
    Json,
    /// Multi-line human output for local runs.
    Pretty,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log format `{0}` (expected json or pretty)")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

impl LogFormat {
    /// Reads `LOG_FORMAT`. Missing or unknown values fall back to JSON.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Instrumented service calls log one
/// line with their duration when their span closes.
pub fn init_logging(format: LogFormat) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let builder = fmt::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_target(false)
        .with_timer(UtcTime::rfc_3339())
        .with_span_events(FmtSpan::CLOSE);

    let installed = match format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            builder.json().with_current_span(true).finish(),
        ),
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish()),
    };

    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
