use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Install the stderr subscriber. An explicit `--log-level` wins over
/// `RUST_LOG`; with neither, only warnings are shown.
pub fn init(level: Option<&str>) -> Result<(), TelemetryError> {
    let filter = match level {
        Some(l) => parse_filter(l)?,
        None => match EnvFilter::try_from_default_env() {
            Ok(f) => f,
            Err(_) => parse_filter(DEFAULT_LOG_LEVEL)?,
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}

fn parse_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|source| TelemetryError::Filter {
        filter: filter.to_string(),
        source,
    })
}
